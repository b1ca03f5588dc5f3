use chrono::{DateTime, Utc};
use rusqlite::{types::Value, Connection, OptionalExtension, Row};
use tracing::{debug, info, warn};

use super::models::{Command, CommandStatus, MainCommand};
use crate::error::{CommandError, Result};
use crate::utils::time;

const MAIN_COMMAND_COLUMNS: &str = "id, name, params, format, data_size, total_size";
const COMMAND_COLUMNS: &str = "id, command_type, status, params, created_on, updated_on";

/// Filters for [`Database::list_commands`]. A `limit` of 0 means no limit.
#[derive(Debug, Clone, Default)]
pub struct CommandFilter {
    pub limit: usize,
    pub status: Option<CommandStatus>,
    pub command_type: Option<i64>,
    pub since: Option<DateTime<Utc>>,
}

/// SQLite backed catalog and ledger.
///
/// Every write validates first and then runs inside a single transaction, so
/// a record only gets an id once it is known to be valid.
pub struct Database {
    conn: Connection,
    path: String,
}

impl Database {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Database { conn, path: path.to_string() };
        db.init()?;
        debug!(path = %db.path, "database opened");
        Ok(db)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS main_commands (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                params TEXT,
                format TEXT,
                data_size INTEGER NOT NULL,
                total_size INTEGER NOT NULL
            )",
            [],
        )?;

        let statuses = CommandStatus::all()
            .iter()
            .map(|s| format!("'{}'", s))
            .collect::<Vec<_>>()
            .join(", ");
        self.conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS commands (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    command_type INTEGER NOT NULL REFERENCES main_commands(id),
                    status TEXT NOT NULL DEFAULT '{}' CHECK (status IN ({})),
                    params TEXT,
                    created_on TEXT NOT NULL,
                    updated_on TEXT NOT NULL
                )",
                CommandStatus::default(),
                statuses
            ),
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_commands_command_type ON commands(command_type)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_commands_status ON commands(status)",
            [],
        )?;

        Ok(())
    }

    /// Validates and stores a new template, returning its id. Any id already
    /// on `command` is ignored.
    pub fn add_main_command(&mut self, command: &MainCommand) -> Result<i64> {
        if let Err(e) = command.validate() {
            warn!(name = %command.name, error = %e, "rejected main command");
            return Err(e);
        }

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO main_commands (name, params, format, data_size, total_size)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                command.name,
                command.params,
                command.format,
                command.data_size,
                command.total_size,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(id, name = %command.name, "main command created");
        Ok(id)
    }

    pub fn get_main_command(&self, id: i64) -> Result<Option<MainCommand>> {
        fetch_main_command(&self.conn, id)
    }

    pub fn list_main_commands(&self) -> Result<Vec<MainCommand>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM main_commands ORDER BY id ASC",
            MAIN_COMMAND_COLUMNS
        ))?;
        let commands = stmt
            .query_map([], main_command_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(commands)
    }

    /// Re-validates and rewrites an existing template.
    pub fn update_main_command(&mut self, command: &MainCommand) -> Result<()> {
        let id = command.id.ok_or(CommandError::MissingId("main command"))?;
        command.validate()?;

        let tx = self.conn.transaction()?;
        let rows_affected = tx.execute(
            "UPDATE main_commands
             SET name = ?1,
                 params = ?2,
                 format = ?3,
                 data_size = ?4,
                 total_size = ?5
             WHERE id = ?6",
            rusqlite::params![
                command.name,
                command.params,
                command.format,
                command.data_size,
                command.total_size,
                id
            ],
        )?;
        if rows_affected == 0 {
            return Err(CommandError::template_not_found(id));
        }
        tx.commit()?;

        info!(id, name = %command.name, "main command updated");
        Ok(())
    }

    /// Issues a new pending command against template `command_type`.
    pub fn add_command(&mut self, command_type: i64, params: Option<&str>) -> Result<Command> {
        let tx = self.conn.transaction()?;

        let template = fetch_main_command(&tx, command_type)?
            .ok_or_else(|| CommandError::template_not_found(command_type))?;
        let mut command = match Command::new(&template, params.map(str::to_string)) {
            Ok(command) => command,
            Err(e) => {
                warn!(command_type, error = %e, "rejected command");
                return Err(e);
            }
        };

        tx.execute(
            "INSERT INTO commands (command_type, status, params, created_on, updated_on)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                command.command_type,
                command.status.as_ref(),
                command.params,
                time::to_storage(&command.created_on),
                time::to_storage(&command.updated_on),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        command.id = Some(id);
        info!(id, command_type, template = %template.name, "command issued");
        Ok(command)
    }

    pub fn get_command(&self, id: i64) -> Result<Option<Command>> {
        fetch_command(&self.conn, id)
    }

    /// Newest first.
    pub fn list_commands(&self, filter: &CommandFilter) -> Result<Vec<Command>> {
        let mut sql = format!("SELECT {} FROM commands WHERE 1 = 1", COMMAND_COLUMNS);
        let mut args: Vec<Value> = Vec::new();

        if let Some(status) = filter.status {
            args.push(Value::Text(status.to_string()));
            sql.push_str(&format!(" AND status = ?{}", args.len()));
        }
        if let Some(command_type) = filter.command_type {
            args.push(Value::Integer(command_type));
            sql.push_str(&format!(" AND command_type = ?{}", args.len()));
        }
        if let Some(since) = filter.since {
            args.push(Value::Text(time::to_storage(&since)));
            sql.push_str(&format!(" AND created_on >= ?{}", args.len()));
        }
        sql.push_str(" ORDER BY created_on DESC, id DESC");
        if filter.limit > 0 {
            args.push(Value::Integer(filter.limit as i64));
            sql.push_str(&format!(" LIMIT ?{}", args.len()));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(args))?;
        let mut commands = Vec::new();
        while let Some(row) = rows.next()? {
            commands.push(command_from_row(row)?);
        }
        Ok(commands)
    }

    pub fn commands_for_template(&self, command_type: i64) -> Result<Vec<Command>> {
        self.list_commands(&CommandFilter {
            command_type: Some(command_type),
            ..Default::default()
        })
    }

    /// Status hook for the transport layer. `status` must name a member of
    /// [`CommandStatus`].
    pub fn update_command_status(&mut self, id: i64, status: &str) -> Result<Command> {
        let status = CommandStatus::parse(status)?;
        self.set_command_status(id, status)
    }

    pub fn set_command_status(&mut self, id: i64, status: CommandStatus) -> Result<Command> {
        let tx = self.conn.transaction()?;

        let mut command =
            fetch_command(&tx, id)?.ok_or_else(|| CommandError::command_not_found(id))?;
        let previous = command.status;
        command.set_status(status);

        tx.execute(
            "UPDATE commands SET status = ?1, updated_on = ?2 WHERE id = ?3",
            rusqlite::params![
                command.status.as_ref(),
                time::to_storage(&command.updated_on),
                id
            ],
        )?;
        tx.commit()?;

        info!(id, from = %previous, to = %command.status, "command status updated");
        Ok(command)
    }
}

fn fetch_main_command(conn: &Connection, id: i64) -> Result<Option<MainCommand>> {
    let command = conn
        .query_row(
            &format!("SELECT {} FROM main_commands WHERE id = ?1", MAIN_COMMAND_COLUMNS),
            [id],
            main_command_from_row,
        )
        .optional()?;
    Ok(command)
}

fn fetch_command(conn: &Connection, id: i64) -> Result<Option<Command>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM commands WHERE id = ?1",
        COMMAND_COLUMNS
    ))?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some(command_from_row(row)?)),
        None => Ok(None),
    }
}

fn main_command_from_row(row: &Row) -> rusqlite::Result<MainCommand> {
    Ok(MainCommand {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        params: row.get(2)?,
        format: row.get(3)?,
        data_size: row.get(4)?,
        total_size: row.get(5)?,
    })
}

fn command_from_row(row: &Row) -> Result<Command> {
    Ok(Command {
        id: Some(row.get(0)?),
        command_type: row.get(1)?,
        status: CommandStatus::parse(&row.get::<_, String>(2)?)?,
        params: row.get(3)?,
        created_on: time::from_storage(&row.get::<_, String>(4)?)?,
        updated_on: time::from_storage(&row.get::<_, String>(5)?)?,
    })
}
