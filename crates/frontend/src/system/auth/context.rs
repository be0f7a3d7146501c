use contracts::system::auth::UserInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::api;

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub user_info: Option<UserInfo>,
    /// Session restore finished (successfully or not)
    pub checked: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user_info.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user_info.as_ref().map(|u| u.is_admin).unwrap_or(false)
    }
}

/// Auth context provider component
///
/// The session lives in an HttpOnly cookie, so the only way to restore it
/// is asking the backend who we are.
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState::default());

    Effect::new(move |_| {
        spawn_local(async move {
            let user_info = api::get_current_user().await.ok();
            set_auth_state.set(AuthState {
                user_info,
                checked: true,
            });
        });
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Logout and drop back to the login page
pub fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    spawn_local(async move {
        if let Err(e) = api::logout().await {
            log::warn!("Logout request failed: {}", e);
        }
        set_auth_state.set(AuthState {
            user_info: None,
            checked: true,
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_state_flags() {
        let anonymous = AuthState::default();
        assert!(!anonymous.is_authenticated());
        assert!(!anonymous.is_admin());

        let admin = AuthState {
            user_info: Some(UserInfo {
                id: "u1".into(),
                email: "admin@local".into(),
                full_name: None,
                is_admin: true,
            }),
            checked: true,
        };
        assert!(admin.is_authenticated());
        assert!(admin.is_admin());
    }
}
