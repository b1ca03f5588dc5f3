use anyhow::{anyhow, Context, Result};
use chrono::Local;
use colored::*;
use serde::Serialize;

use super::args::{Commands, TemplateCommands};
use crate::db::{Command, CommandFilter, CommandStatus, Database, MainCommand};
use crate::error::CommandError;
use crate::utils::{params, time};

const RULE: &str = "─────────────────────────────────────────────";

pub fn handle_command(command: Commands, db: &mut Database, json: bool) -> Result<()> {
    match command {
        Commands::Template { action } => match action {
            TemplateCommands::Add {
                name,
                param,
                params: raw_params,
                format,
                data_size,
                total_size,
            } => {
                let (params, format) = if param.is_empty() {
                    (raw_params, format)
                } else {
                    params::params_and_format(&param)?
                };
                let template = MainCommand::new(name, params, format, data_size, total_size)?;
                let id = db.add_main_command(&template)?;
                let stored = db
                    .get_main_command(id)?
                    .ok_or_else(|| CommandError::template_not_found(id))?;
                if json {
                    print_json(&stored)?;
                } else {
                    println!("Template added to catalog with ID: {}", id);
                }
            }
            TemplateCommands::Ls => {
                let templates = db.list_main_commands()?;
                if json {
                    print_json(&templates)?;
                } else {
                    print_templates(&templates);
                }
            }
            TemplateCommands::Show { template_id } => {
                let template = db
                    .get_main_command(template_id)?
                    .ok_or_else(|| CommandError::template_not_found(template_id))?;
                let commands = db.commands_for_template(template_id)?;
                if json {
                    print_json(&serde_json::json!({
                        "template": template,
                        "commands": commands,
                    }))?;
                } else {
                    print_templates(std::slice::from_ref(&template));
                    print_commands(db, &commands)?;
                }
            }
        },
        Commands::Issue { template_id, params } => {
            let command = db.add_command(template_id, params.as_deref())?;
            if json {
                print_json(&command)?;
            } else {
                println!(
                    "Command issued with ID: {} ({})",
                    command.id.unwrap_or(0),
                    colorize_status(command.status)
                );
            }
        }
        Commands::Ls {
            limit,
            status,
            since,
            template,
        } => {
            let status = status.as_deref().map(CommandStatus::parse).transpose()?;
            let since = since
                .as_deref()
                .map(|s| time::parse_datetime(s).ok_or_else(|| anyhow!("Invalid date: {}", s)))
                .transpose()?;
            let commands = db.list_commands(&CommandFilter {
                limit,
                status,
                command_type: template,
                since,
            })?;
            if json {
                print_json(&commands)?;
            } else {
                print_commands(db, &commands)?;
            }
        }
        Commands::Show { command_id } => {
            let command = db
                .get_command(command_id)?
                .ok_or_else(|| CommandError::command_not_found(command_id))?;
            if json {
                print_json(&command)?;
            } else {
                print_commands(db, std::slice::from_ref(&command))?;
            }
        }
        Commands::Status { command_id, status } => {
            let command = db
                .update_command_status(command_id, &status)
                .with_context(|| format!("Failed to update command {}", command_id))?;
            if json {
                print_json(&command)?;
            } else {
                println!(
                    "Command {} is now {}",
                    command_id,
                    colorize_status(command.status)
                );
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn colorize_status(status: CommandStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        CommandStatus::Pending => label.yellow(),
        CommandStatus::Sent => label.blue(),
        CommandStatus::Acknowledged => label.green(),
        CommandStatus::Failed => label.red().bold(),
    }
}

fn print_templates(templates: &[MainCommand]) {
    if templates.is_empty() {
        println!("No templates found.");
        return;
    }

    println!("\n{} template{}:", templates.len(), if templates.len() == 1 { "" } else { "s" });
    println!("{}", RULE);

    for template in templates {
        println!(
            "({}) {}",
            template.id.unwrap_or(0),
            template.name.bold()
        );
        println!(
            "    Size: {} data / {} total bytes",
            template.data_size, template.total_size
        );
        let specs = template.param_specs();
        if !specs.is_empty() {
            let rendered = specs
                .iter()
                .map(|(name, format)| format!("{}:{}", name, format.cyan()))
                .collect::<Vec<_>>()
                .join(", ");
            println!("    Params: {}", rendered);
        }
        println!("{}", RULE);
    }
}

fn print_commands(db: &Database, commands: &[Command]) -> Result<()> {
    if commands.is_empty() {
        println!("No matching commands found.");
        return Ok(());
    }

    println!("\nFound {} matching commands:", commands.len());
    println!("{}", RULE);

    for cmd in commands {
        let template = db.get_main_command(cmd.command_type)?;
        let name = template
            .as_ref()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("#{}", cmd.command_type));

        println!(
            "({}) [{}] {} {}",
            cmd.id.unwrap_or(0),
            cmd.created_on.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
            name.bold(),
            colorize_status(cmd.status)
        );

        let values = cmd.param_values();
        if !values.is_empty() {
            let names: Vec<String> = template
                .as_ref()
                .map(|t| t.param_specs().into_iter().map(|(n, _)| n.to_string()).collect())
                .unwrap_or_default();
            let rendered = values
                .iter()
                .enumerate()
                .map(|(i, value)| match names.get(i) {
                    Some(name) => format!("{}={}", name, value),
                    None => value.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            println!("    Params: {}", rendered);
        }

        if cmd.updated_on != cmd.created_on {
            println!(
                "    Updated: {}",
                cmd.updated_on.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
            );
        }

        println!("{}", RULE);
    }
    Ok(())
}
