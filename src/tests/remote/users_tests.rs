use std::sync::Arc;

use super::*;
use crate::model::Role;
use crate::session::SessionStore;
use crate::store::MemoryStorage;

fn gateway() -> UserGateway {
    let session = SessionStore::new(Arc::new(MemoryStorage::new()));
    UserGateway::new(ApiClient::new("http://127.0.0.1:9", session).unwrap())
}

#[test]
fn form_fields_follow_the_server_contract() {
    let form = UserForm {
        first_name: "Alice".into(),
        last_name: "Liddell".into(),
        user_name: "alice".into(),
        email: "alice@example.com".into(),
        role: Some(Role::Manager),
        active: true,
        not_locked: false,
    };
    let fields = user_form_fields("admin", &form);
    let names: Vec<_> = fields.iter().map(|(n, _)| *n).collect();
    assert_eq!(
        names,
        vec![
            "currentUsername",
            "firstName",
            "lastName",
            "username",
            "email",
            "role",
            "isActive",
            "isNonLocked"
        ]
    );
    assert_eq!(fields[0].1, "admin");
    assert_eq!(fields[5].1, "ROLE_MANAGER");
    assert_eq!(fields[6].1, "true");
    assert_eq!(fields[7].1, "false");
}

#[test]
fn missing_role_is_sent_as_empty_text() {
    let fields = user_form_fields("", &UserForm::default());
    assert_eq!(fields[0].1, "");
    assert_eq!(fields[5].1, "");
}

#[test]
fn empty_cache_reads_as_none() {
    assert_eq!(gateway().users_from_cache().unwrap(), None);
}

#[test]
fn cached_list_round_trips_in_order() {
    let g = gateway();
    let users: Vec<User> = ["carol", "alice", "bob"]
        .iter()
        .map(|name| User {
            user_name: name.to_string(),
            user_id: format!("id-{}", name),
            ..User::default()
        })
        .collect();
    g.add_users_to_cache(&users).unwrap();
    assert_eq!(g.users_from_cache().unwrap(), Some(users));
}

#[test]
fn path_segments_are_percent_encoded() {
    let g = gateway();
    let url = g
        .api
        .url_with_segment("/user/resetpassword", "a b/c@example.com")
        .unwrap();
    assert_eq!(
        url.as_str(),
        "http://127.0.0.1:9/user/resetpassword/a%20b%2Fc@example.com"
    );
}
