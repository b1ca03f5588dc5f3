use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{CommandError, Result};
use crate::utils::{params, time};

/// A command template: every command that can be issued to the OBC is one of these.
///
/// `params` and `format` are comma separated token lists with no whitespace
/// around the commas, e.g. `"alt,speed"` and `"float,int"`. The Nth format
/// token describes how the Nth parameter is encoded on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainCommand {
    pub id: Option<i64>,
    pub name: String,
    pub params: Option<String>,
    pub format: Option<String>,
    pub data_size: i64,
    pub total_size: i64,
}

impl MainCommand {
    /// Builds a template that has not been saved yet. Fails if the fields
    /// break the params/format contract or the size rules.
    pub fn new(
        name: impl Into<String>,
        params: Option<String>,
        format: Option<String>,
        data_size: i64,
        total_size: i64,
    ) -> Result<Self> {
        let cmd = MainCommand {
            id: None,
            name: name.into(),
            params,
            format,
            data_size,
            total_size,
        };
        cmd.validate()?;
        Ok(cmd)
    }

    /// Checks every template invariant. Safe to call any number of times.
    pub fn validate(&self) -> Result<()> {
        validate_params_format(self.params.as_deref(), self.format.as_deref())?;

        if self.name.trim().is_empty() {
            return Err(CommandError::InvalidTemplate("name must not be empty".into()));
        }
        if self.data_size < 0 || self.total_size < 0 {
            return Err(CommandError::InvalidTemplate(format!(
                "sizes must be non-negative (data_size {}, total_size {})",
                self.data_size, self.total_size
            )));
        }
        if self.total_size < self.data_size {
            return Err(CommandError::InvalidTemplate(format!(
                "total_size {} is smaller than data_size {}",
                self.total_size, self.data_size
            )));
        }
        Ok(())
    }

    /// Number of parameters the template declares; zero when it has none.
    pub fn param_arity(&self) -> usize {
        self.params.as_deref().map(params::arity).unwrap_or(0)
    }

    /// `(name, format)` pairs in declaration order.
    pub fn param_specs(&self) -> Vec<(&str, &str)> {
        match (self.params.as_deref(), self.format.as_deref()) {
            (Some(p), Some(f)) => params::split_tokens(p)
                .into_iter()
                .zip(params::split_tokens(f))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Checks that an instance payload carries as many values as this
    /// template declares parameters.
    pub fn check_payload(&self, payload: Option<&str>) -> Result<()> {
        match (self.params.as_deref(), payload) {
            (None, None) => Ok(()),
            (None, Some(_)) => Err(CommandError::SchemaMismatch(format!(
                "Template {:?} declares no params but command params were supplied",
                self.name
            ))),
            (Some(declared), payload) => {
                let expected = params::arity(declared);
                let actual = payload.map(params::arity).unwrap_or(0);
                if expected != actual {
                    return Err(CommandError::SchemaMismatch(format!(
                        "Command params has {} data entries but template {:?} declares {}",
                        actual, self.name, expected
                    )));
                }
                Ok(())
            }
        }
    }
}

/// `params` and `format` must be both absent, or both present with the same
/// number of comma separated entries.
pub fn validate_params_format(params: Option<&str>, format: Option<&str>) -> Result<()> {
    match (params, format) {
        (Some(_), None) => Err(CommandError::SchemaMismatch(
            "The format is set but the params is not".into(),
        )),
        (None, Some(_)) => Err(CommandError::SchemaMismatch(
            "The params is set but the format is not".into(),
        )),
        (Some(p), Some(f)) => {
            let params_length = params::arity(p);
            let format_length = params::arity(f);
            if params_length != format_length {
                return Err(CommandError::SchemaMismatch(format!(
                    "Params and format do not match specifications. Params has {} data entries and format has {} data entries",
                    params_length, format_length
                )));
            }
            Ok(())
        }
        (None, None) => Ok(()),
    }
}

/// Lifecycle of an issued command. No transition graph is enforced.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandStatus {
    #[default]
    Pending,
    Sent,
    Acknowledged,
    Failed,
}

impl CommandStatus {
    /// Parses the stored/wire name. Anything outside the enumeration is
    /// `InvalidStatus`.
    pub fn parse(s: &str) -> Result<Self> {
        CommandStatus::from_str(s).map_err(|_| CommandError::InvalidStatus(s.to_string()))
    }

    pub fn all() -> Vec<CommandStatus> {
        CommandStatus::iter().collect()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CommandStatus::Acknowledged | CommandStatus::Failed)
    }
}

/// An issued instance of a [`MainCommand`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub id: Option<i64>,
    pub command_type: i64,
    pub status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub params: Option<String>,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

impl Command {
    /// Builds a pending instance of `template`. The template must already be
    /// saved and `params` must match its declared arity.
    pub fn new(template: &MainCommand, params: Option<String>) -> Result<Self> {
        let command_type = template.id.ok_or(CommandError::MissingId("main command"))?;
        template.check_payload(params.as_deref())?;

        let now = time::now();
        Ok(Command {
            id: None,
            command_type,
            status: CommandStatus::default(),
            params,
            created_on: now,
            updated_on: now,
        })
    }

    /// Sets the status and moves `updated_on` strictly forward.
    pub fn set_status(&mut self, status: CommandStatus) {
        self.status = status;
        self.updated_on = time::advance_from(self.updated_on);
    }

    pub fn param_values(&self) -> Vec<&str> {
        self.params.as_deref().map(params::split_tokens).unwrap_or_default()
    }
}
