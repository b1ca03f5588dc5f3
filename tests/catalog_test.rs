use anyhow::Result;
use obc_commands::db::models::{validate_params_format, MainCommand};
use obc_commands::CommandError;

use test_utils::{add_template, create_test_db};

fn template(params: Option<&str>, format: Option<&str>) -> Result<MainCommand, CommandError> {
    MainCommand::new(
        "set_attitude",
        params.map(str::to_string),
        format.map(str::to_string),
        10,
        20,
    )
}

#[test]
fn test_template_without_params() -> Result<()> {
    let cmd = template(None, None)?;
    assert!(cmd.id.is_none());
    assert_eq!(cmd.data_size, 10);
    assert_eq!(cmd.total_size, 20);
    assert_eq!(cmd.param_arity(), 0);
    assert!(cmd.param_specs().is_empty());
    Ok(())
}

#[test]
fn test_template_with_matching_params() -> Result<()> {
    let cmd = template(Some("alt,speed"), Some("float,int"))?;
    assert_eq!(cmd.param_arity(), 2);
    assert_eq!(cmd.param_specs(), vec![("alt", "float"), ("speed", "int")]);
    Ok(())
}

#[test]
fn test_params_without_format() {
    let err = template(Some("alt"), None).unwrap_err();
    assert!(matches!(err, CommandError::SchemaMismatch(_)));
    assert_eq!(err.to_string(), "The format is set but the params is not");
}

#[test]
fn test_format_without_params() {
    let err = template(None, Some("x")).unwrap_err();
    assert!(matches!(err, CommandError::SchemaMismatch(_)));
    assert_eq!(err.to_string(), "The params is set but the format is not");
}

#[test]
fn test_arity_mismatch_reports_both_counts() {
    let err = template(Some("a,b"), Some("x")).unwrap_err();
    assert!(matches!(err, CommandError::SchemaMismatch(_)));
    let msg = err.to_string();
    assert!(msg.contains("Params has 2 data entries"), "{}", msg);
    assert!(msg.contains("format has 1 data entries"), "{}", msg);
}

#[test]
fn test_empty_tokens_still_count() {
    // "a," is two tokens, the second one empty
    assert!(validate_params_format(Some("a,"), Some("x,y")).is_ok());
    assert!(validate_params_format(Some(""), Some("x")).is_ok());
    assert!(validate_params_format(Some("a,"), Some("x")).is_err());
}

#[test]
fn test_revalidation_is_idempotent() -> Result<()> {
    let cmd = template(Some("a,b,c"), Some("u8,u16,u32"))?;
    for _ in 0..3 {
        cmd.validate()?;
    }
    let cmd = template(None, None)?;
    cmd.validate()?;
    cmd.validate()?;
    Ok(())
}

#[test]
fn test_size_rules() {
    let err = MainCommand::new("ping", None, None, 20, 10).unwrap_err();
    assert!(matches!(err, CommandError::InvalidTemplate(_)));

    let err = MainCommand::new("ping", None, None, -1, 10).unwrap_err();
    assert!(matches!(err, CommandError::InvalidTemplate(_)));

    assert!(MainCommand::new("ping", None, None, 0, 0).is_ok());
    assert!(MainCommand::new("ping", None, None, 4, 4).is_ok());
}

#[test]
fn test_empty_name_rejected() {
    let err = MainCommand::new("  ", None, None, 0, 4).unwrap_err();
    assert!(matches!(err, CommandError::InvalidTemplate(_)));
}

#[test]
fn test_store_assigns_ids() -> Result<()> {
    let (mut db, _db_dir) = create_test_db()?;

    let first = add_template(&mut db, "ping", None, None)?;
    let second = add_template(&mut db, "set_alt", Some("alt"), Some("float"))?;
    assert!(first > 0);
    assert!(second > first);

    let stored = db.get_main_command(second)?.unwrap();
    assert_eq!(stored.id, Some(second));
    assert_eq!(stored.name, "set_alt");
    assert_eq!(stored.params.as_deref(), Some("alt"));
    assert_eq!(stored.format.as_deref(), Some("float"));

    let all = db.list_main_commands()?;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "ping");

    assert!(db.get_main_command(9999)?.is_none());
    Ok(())
}

#[test]
fn test_invalid_template_is_never_stored() -> Result<()> {
    let (mut db, _db_dir) = create_test_db()?;

    // Fields are public, so a broken template can be built by hand
    let broken = MainCommand {
        id: None,
        name: "broken".to_string(),
        params: Some("a,b".to_string()),
        format: Some("x".to_string()),
        data_size: 1,
        total_size: 2,
    };
    let err = db.add_main_command(&broken).unwrap_err();
    assert!(matches!(err, CommandError::SchemaMismatch(_)));
    assert!(db.list_main_commands()?.is_empty());

    // The id sequence is untouched by the rejected insert
    let id = add_template(&mut db, "ok", None, None)?;
    assert_eq!(id, 1);
    Ok(())
}

#[test]
fn test_update_template_revalidates() -> Result<()> {
    let (mut db, _db_dir) = create_test_db()?;
    let id = add_template(&mut db, "set_alt", Some("alt"), Some("float"))?;

    let mut stored = db.get_main_command(id)?.unwrap();
    stored.params = Some("alt,speed".to_string());
    let err = db.update_main_command(&stored).unwrap_err();
    assert!(matches!(err, CommandError::SchemaMismatch(_)));
    assert_eq!(db.get_main_command(id)?.unwrap().params.as_deref(), Some("alt"));

    stored.format = Some("float,int".to_string());
    db.update_main_command(&stored)?;
    let updated = db.get_main_command(id)?.unwrap();
    assert_eq!(updated.param_arity(), 2);

    // Unchanged template re-validates cleanly
    db.update_main_command(&updated)?;
    Ok(())
}

#[test]
fn test_update_template_requires_existing_id() -> Result<()> {
    let (mut db, _db_dir) = create_test_db()?;

    let unsaved = MainCommand::new("ping", None, None, 0, 1)?;
    let err = db.update_main_command(&unsaved).unwrap_err();
    assert!(matches!(err, CommandError::MissingId(_)));

    let mut missing = unsaved.clone();
    missing.id = Some(42);
    let err = db.update_main_command(&missing).unwrap_err();
    assert!(matches!(err, CommandError::NotFound { id: 42, .. }));
    Ok(())
}
