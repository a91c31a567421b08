use super::*;
use crate::notify::RecordingNotifier;
use crate::remote::ApiClient;
use crate::session::SessionStore;
use crate::store::MemoryStorage;

fn screen() -> (UserScreen, RecordingNotifier) {
    let session = SessionStore::new(Arc::new(MemoryStorage::new()));
    // Nothing listens on the discard port; these tests never wait on the network.
    let api = ApiClient::new("http://127.0.0.1:9", session).unwrap();
    let notifier = RecordingNotifier::new();
    let screen = UserScreen::new(
        AuthGateway::new(api.clone()),
        UserGateway::new(api),
        Arc::new(notifier.clone()),
    );
    (screen, notifier)
}

fn login_as(screen: &UserScreen, role: Option<Role>) {
    screen
        .auth
        .add_user_to_cache(&User {
            user_name: "me".into(),
            role,
            ..User::default()
        })
        .unwrap();
}

#[test]
fn cache_busted_appends_millis() {
    let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
    assert_eq!(
        cache_busted("http://h/user/image/alice", now),
        "http://h/user/image/alice?time=1700000000000"
    );
    assert_eq!(
        cache_busted("http://h/img?time=5", now),
        "http://h/img?time=1700000000000"
    );
    assert_eq!(
        cache_busted("http://h/img?size=2", now),
        "http://h/img?size=2&time=1700000000000"
    );
}

#[test]
fn cache_busted_replaces_time_in_any_position() {
    let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
    assert_eq!(
        cache_busted("http://h/img?size=2&time=5", now),
        "http://h/img?size=2&time=1700000000000"
    );
    assert_eq!(
        cache_busted("http://h/img?time=5&size=2", now),
        "http://h/img?size=2&time=1700000000000"
    );

    let later = OffsetDateTime::from_unix_timestamp(1_700_000_001).unwrap();
    let twice = cache_busted(&cache_busted("http://h/img?size=2", now), later);
    assert_eq!(twice, "http://h/img?size=2&time=1700000001000");
}

#[test]
fn role_flags_follow_the_session_user() {
    let (s, _) = screen();
    assert!(!s.is_admin() && !s.is_manager() && !s.is_admin_or_manager());

    for (role, admin, manager) in [
        (Role::User, false, false),
        (Role::Hr, false, false),
        (Role::Manager, false, true),
        (Role::Admin, true, true),
        (Role::SuperAdmin, true, true),
    ] {
        login_as(&s, Some(role));
        assert_eq!(s.is_admin(), admin, "{:?}", role);
        assert_eq!(s.is_manager(), manager, "{:?}", role);
        assert_eq!(s.is_admin_or_manager(), admin || manager, "{:?}", role);
    }
}

#[test]
fn search_reads_the_cached_list() {
    let (mut s, _) = screen();
    let users: Vec<User> = ["alice", "bob"]
        .iter()
        .map(|n| User {
            user_name: n.to_string(),
            ..User::default()
        })
        .collect();
    s.users_api.add_users_to_cache(&users).unwrap();

    s.search_users("BO");
    assert_eq!(s.users().len(), 1);
    assert_eq!(s.users()[0].user_name, "bob");

    s.search_users("nobody");
    assert_eq!(s.users(), users.as_slice());

    s.search_users("");
    assert_eq!(s.users(), users.as_slice());
}

#[test]
fn search_without_cache_shows_nothing() {
    let (mut s, _) = screen();
    s.search_users("a");
    assert!(s.users().is_empty());
}

#[test]
fn logout_clears_session_and_notifies() {
    let (mut s, notes) = screen();
    login_as(&s, Some(Role::Admin));
    s.auth.save_token("t.t.t").unwrap();

    assert_eq!(s.logout(), Route::Login);
    assert_eq!(s.auth.user_from_cache().unwrap(), None);
    assert_eq!(s.auth.session().load_token().unwrap(), None);
    let last = notes.last().unwrap();
    assert_eq!(last.kind, NotificationType::Success);
    assert_eq!(last.message, "You've been successfully logged out");
}

#[test]
fn upload_without_image_warns_and_sends_nothing() {
    let (mut s, notes) = screen();
    s.update_profile_image();
    assert_eq!(s.pending_requests(), 0);
    assert_eq!(notes.last().unwrap().kind, NotificationType::Warning);
    assert_eq!(s.file_status(), FileUploadStatus::default());
}

#[test]
fn progress_completion_updates_percentage() {
    let (mut s, _) = screen();
    s.apply(Completion::UploadProgress(UploadProgress {
        loaded: 50,
        total: 100,
    }));
    assert_eq!(
        s.file_status(),
        FileUploadStatus {
            status: UploadPhase::Progress,
            percentage: 50
        }
    );
}

#[test]
fn edit_user_sets_form_and_actor() {
    let (mut s, _) = screen();
    let target = User {
        user_name: "bob".into(),
        first_name: "Bob".into(),
        role: Some(Role::Hr),
        active: true,
        ..User::default()
    };
    s.edit_user(&target);
    assert_eq!(s.edit_target().user_name, "bob");
    assert_eq!(s.edit_target().role, Some(Role::Hr));
    assert_eq!(s.current_username, "bob");
}

#[test]
fn requests_after_teardown_are_ignored() {
    let (mut s, _) = screen();
    s.teardown();
    s.load_users(true);
    s.delete_user("alice");
    assert_eq!(s.pending_requests(), 0);
    assert_eq!(s.list_state(), &ListState::NotLoaded);
}

#[test]
fn change_title_replaces_default() {
    let (mut s, _) = screen();
    assert_eq!(s.title(), "Users");
    s.change_title("Settings");
    assert_eq!(s.title(), "Settings");
}
