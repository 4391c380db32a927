use dynamap_core::schema::{schema_of, FieldDef, Model, ModelDef};
use dynamap_core::{Error, InvalidOperationError};
use dynamap_expr::compile_projection;
use pretty_assertions::assert_eq;

struct Profile;

impl Model for Profile {
    fn definition() -> ModelDef {
        ModelDef::new("profiles", "Profile").field(FieldDef::string("bio"))
    }
}

struct Account;

impl Model for Account {
    fn definition() -> ModelDef {
        ModelDef::new("accounts", "Account")
            .field(FieldDef::string("id").partition_key())
            .field(FieldDef::string("name").wire_name("fullName"))
            .field(FieldDef::list("addresses"))
            .field(FieldDef::nested::<Profile>("profile"))
    }
}

#[test]
fn projection_lists_resolved_paths() {
    let schema = schema_of::<Account>().unwrap();
    let compiled =
        compile_projection(&schema, ["name", "profile.bio", "addresses[0]"]).unwrap();

    assert_eq!(
        compiled.statement,
        "#fullName, #profile.#bio, #addresses[0]"
    );
    assert_eq!(compiled.names.get("#fullName"), Some(&"fullName".to_string()));
    assert_eq!(compiled.names.get("#profile"), Some(&"profile".to_string()));
    assert_eq!(compiled.names.get("#bio"), Some(&"bio".to_string()));
    assert_eq!(
        compiled.names.get("#addresses"),
        Some(&"addresses".to_string())
    );
    assert!(compiled.values.is_empty());
}

#[test]
fn projection_rejects_unknown_fields() {
    let schema = schema_of::<Account>().unwrap();
    assert!(matches!(
        compile_projection(&schema, ["nope"]),
        Err(Error::InvalidOperation(
            InvalidOperationError::UnknownField { .. }
        ))
    ));
}
