use anyhow::Result;
use clap::Parser;
use obc_commands::cli::args::{Cli, Commands, TemplateCommands};
use std::path::PathBuf;

#[test]
fn test_template_add_with_param_pairs() -> Result<()> {
    let args = Cli::try_parse_from([
        "obc-commands",
        "template",
        "add",
        "--name",
        "set_alt",
        "--param",
        "alt:float",
        "-p",
        "speed:int",
        "--data-size",
        "8",
        "--total-size",
        "12",
    ])?;

    match args.command {
        Commands::Template {
            action:
                TemplateCommands::Add {
                    name,
                    param,
                    params,
                    format,
                    data_size,
                    total_size,
                },
        } => {
            assert_eq!(name, "set_alt");
            assert_eq!(param, vec!["alt:float", "speed:int"]);
            assert!(params.is_none());
            assert!(format.is_none());
            assert_eq!(data_size, 8);
            assert_eq!(total_size, 12);
        }
        _ => panic!("Expected Template Add command"),
    }
    Ok(())
}

#[test]
fn test_template_add_raw_lists() -> Result<()> {
    let args = Cli::try_parse_from([
        "obc-commands",
        "template",
        "add",
        "-n",
        "set_alt",
        "--params",
        "alt,speed",
        "--format",
        "float,int",
        "--total-size",
        "12",
    ])?;

    match args.command {
        Commands::Template {
            action:
                TemplateCommands::Add {
                    params,
                    format,
                    data_size,
                    ..
                },
        } => {
            assert_eq!(params.as_deref(), Some("alt,speed"));
            assert_eq!(format.as_deref(), Some("float,int"));
            assert_eq!(data_size, 0);
        }
        _ => panic!("Expected Template Add command"),
    }
    Ok(())
}

#[test]
fn test_template_add_rejects_mixed_forms() {
    let result = Cli::try_parse_from([
        "obc-commands",
        "template",
        "add",
        "--name",
        "x",
        "--param",
        "alt:float",
        "--params",
        "alt",
        "--total-size",
        "1",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_template_add_requires_total_size() {
    let result = Cli::try_parse_from(["obc-commands", "template", "add", "--name", "x"]);
    assert!(result.is_err());
}

#[test]
fn test_issue_parsing() -> Result<()> {
    let args = Cli::try_parse_from(["obc-commands", "issue", "3", "--params", "1200.5,40"])?;
    match args.command {
        Commands::Issue { template_id, params } => {
            assert_eq!(template_id, 3);
            assert_eq!(params.as_deref(), Some("1200.5,40"));
        }
        _ => panic!("Expected Issue command"),
    }

    let args = Cli::try_parse_from(["obc-commands", "issue", "3"])?;
    match args.command {
        Commands::Issue { params, .. } => assert!(params.is_none()),
        _ => panic!("Expected Issue command"),
    }
    Ok(())
}

#[test]
fn test_ls_defaults_and_filters() -> Result<()> {
    let args = Cli::try_parse_from(["obc-commands", "ls"])?;
    match args.command {
        Commands::Ls { limit, status, since, template } => {
            assert_eq!(limit, 50);
            assert!(status.is_none());
            assert!(since.is_none());
            assert!(template.is_none());
        }
        _ => panic!("Expected Ls command"),
    }

    let args = Cli::try_parse_from([
        "obc-commands", "ls", "-l", "0", "--status", "SENT", "--since", "2024-01-01", "-t", "2",
    ])?;
    match args.command {
        Commands::Ls { limit, status, since, template } => {
            assert_eq!(limit, 0);
            assert_eq!(status.as_deref(), Some("SENT"));
            assert_eq!(since.as_deref(), Some("2024-01-01"));
            assert_eq!(template, Some(2));
        }
        _ => panic!("Expected Ls command"),
    }
    Ok(())
}

#[test]
fn test_status_and_global_flags() -> Result<()> {
    let args = Cli::try_parse_from([
        "obc-commands", "status", "7", "ACKNOWLEDGED", "--json", "--db", "/tmp/x.db", "-v",
    ])?;
    assert!(args.json);
    assert!(args.verbose);
    assert_eq!(args.db, Some(PathBuf::from("/tmp/x.db")));
    match args.command {
        Commands::Status { command_id, status } => {
            assert_eq!(command_id, 7);
            assert_eq!(status, "ACKNOWLEDGED");
        }
        _ => panic!("Expected Status command"),
    }
    Ok(())
}

#[test]
fn test_invalid_ids_rejected() {
    assert!(Cli::try_parse_from(["obc-commands", "show", "abc"]).is_err());
    assert!(Cli::try_parse_from(["obc-commands", "issue"]).is_err());
}
