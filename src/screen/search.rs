use crate::model::User;

fn matches(user: &User, needle: &str) -> bool {
    [
        &user.first_name,
        &user.last_name,
        &user.user_name,
        &user.user_id,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Case-insensitive substring match over first/last/user name and user id.
///
/// An empty term, or a term that matches nothing, yields the whole list.
pub fn filter_users(users: &[User], term: &str) -> Vec<User> {
    if term.is_empty() {
        return users.to_vec();
    }
    let needle = term.to_lowercase();
    let hits: Vec<User> = users
        .iter()
        .filter(|u| matches(u, &needle))
        .cloned()
        .collect();
    if hits.is_empty() {
        users.to_vec()
    } else {
        hits
    }
}

#[cfg(test)]
#[path = "../tests/screen/search_tests.rs"]
mod tests;
