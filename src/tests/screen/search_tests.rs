use super::*;

fn user(first: &str, last: &str, name: &str, id: &str) -> User {
    User {
        first_name: first.into(),
        last_name: last.into(),
        user_name: name.into(),
        user_id: id.into(),
        email: format!("{}@example.com", name),
        ..User::default()
    }
}

fn sample() -> Vec<User> {
    vec![
        user("Alice", "Liddell", "alice", "1000000001"),
        user("Bob", "Builder", "bob", "1000000002"),
        user("Carol", "Alison", "cjones", "2000000003"),
    ]
}

fn names(users: &[User]) -> Vec<&str> {
    users.iter().map(|u| u.user_name.as_str()).collect()
}

#[test]
fn matches_any_name_field_case_insensitively() {
    let all = sample();
    assert_eq!(names(&filter_users(&all, "ALI")), vec!["alice", "cjones"]);
    assert_eq!(names(&filter_users(&all, "builder")), vec!["bob"]);
    assert_eq!(names(&filter_users(&all, "CJ")), vec!["cjones"]);
}

#[test]
fn matches_user_id_substrings() {
    let all = sample();
    assert_eq!(names(&filter_users(&all, "0003")), vec!["cjones"]);
    assert_eq!(names(&filter_users(&all, "10000")), vec!["alice", "bob"]);
}

#[test]
fn email_is_not_searched() {
    let all = sample();
    // "example" only appears in emails, so nothing matches and the full list comes back.
    assert_eq!(filter_users(&all, "example"), all);
}

#[test]
fn empty_term_returns_everything() {
    let all = sample();
    assert_eq!(filter_users(&all, ""), all);
}

#[test]
fn zero_matches_fall_back_to_full_list() {
    let all = sample();
    assert_eq!(filter_users(&all, "zzz"), all);
}

#[test]
fn result_preserves_list_order() {
    let all = sample();
    assert_eq!(names(&filter_users(&all, "o")), vec!["bob", "cjones"]);
}
