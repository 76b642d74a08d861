//! Client-side routes and the redirects that guard them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Route {
    Root,
    Dashboard,
    Appointments,
    Cabinet,
    Medicines,
    Doctors,
    Emergency,
    Notifications,
    Chatbot,
    Assistant,
    Profile,
    Login,
    Register,
    Onboarding,
}

impl Route {
    pub const ALL: [Route; 14] = [
        Route::Root,
        Route::Dashboard,
        Route::Appointments,
        Route::Cabinet,
        Route::Medicines,
        Route::Doctors,
        Route::Emergency,
        Route::Notifications,
        Route::Chatbot,
        Route::Assistant,
        Route::Profile,
        Route::Login,
        Route::Register,
        Route::Onboarding,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Dashboard => "/dashboard",
            Route::Appointments => "/appointments",
            Route::Cabinet => "/cabinet",
            Route::Medicines => "/medicines",
            Route::Doctors => "/doctors",
            Route::Emergency => "/emergency",
            Route::Notifications => "/notifications",
            Route::Chatbot => "/chatbot",
            Route::Assistant => "/assistant",
            Route::Profile => "/profile",
            Route::Login => "/auth/login",
            Route::Register => "/auth/register",
            Route::Onboarding => "/onboarding",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        Route::ALL.into_iter().find(|route| route.path() == trimmed)
    }

    pub fn is_auth_page(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

/// What the guards need to know about the current session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub is_new_user: bool,
    pub has_completed_onboarding: bool,
}

impl SessionView {
    pub fn needs_onboarding(&self) -> bool {
        self.is_authenticated && self.is_new_user && !self.has_completed_onboarding
    }
}

/// Where a visit to `route` must be redirected, if anywhere.
///
/// While the session is still loading no redirect is issued; the guard is
/// evaluated again once the provider reports. A fresh identity that has not
/// finished onboarding is sent there instead of the dashboard.
pub fn guard(route: Route, session: &SessionView) -> Option<Route> {
    if session.is_loading {
        return None;
    }

    let home = if session.needs_onboarding() {
        Route::Onboarding
    } else {
        Route::Dashboard
    };

    match route {
        Route::Root => Some(if session.is_authenticated {
            home
        } else {
            Route::Login
        }),
        route if route.is_auth_page() => session.is_authenticated.then_some(home),
        Route::Dashboard if session.needs_onboarding() => Some(Route::Onboarding),
        Route::Onboarding => {
            if !session.is_authenticated {
                Some(Route::Login)
            } else if !session.is_new_user && session.has_completed_onboarding {
                Some(Route::Dashboard)
            } else {
                None
            }
        }
        _ => (!session.is_authenticated).then_some(Route::Login),
    }
}

/// Current location. Cloning shares the same location.
#[derive(Clone)]
pub struct Router {
    tx: Arc<watch::Sender<Route>>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Root)
    }
}

impl Router {
    pub fn new(initial: Route) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn push(&self, route: Route) {
        self.tx.send_replace(route);
    }

    pub fn current(&self) -> Route {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.tx.subscribe()
    }

    /// Navigates to `route`, following its guard redirect if one applies.
    pub fn visit(&self, route: Route, session: &SessionView) -> Route {
        let target = guard(route, session).unwrap_or(route);
        self.push(target);
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in() -> SessionView {
        SessionView {
            is_authenticated: true,
            has_completed_onboarding: true,
            ..Default::default()
        }
    }

    #[test]
    fn paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/doctors/"), Some(Route::Doctors));
        assert_eq!(Route::from_path("/nope"), None);
    }

    #[test]
    fn protected_pages_require_a_session() {
        let signed_out = SessionView::default();
        for route in [Route::Dashboard, Route::Cabinet, Route::Chatbot, Route::Profile] {
            assert_eq!(guard(route, &signed_out), Some(Route::Login));
            assert_eq!(guard(route, &signed_in()), None);
        }
    }

    #[test]
    fn root_and_auth_pages_redirect() {
        assert_eq!(guard(Route::Root, &SessionView::default()), Some(Route::Login));
        assert_eq!(guard(Route::Root, &signed_in()), Some(Route::Dashboard));
        assert_eq!(guard(Route::Register, &signed_in()), Some(Route::Dashboard));
        assert_eq!(guard(Route::Login, &SessionView::default()), None);
    }

    #[test]
    fn onboarding_guard() {
        assert_eq!(guard(Route::Onboarding, &SessionView::default()), Some(Route::Login));
        assert_eq!(guard(Route::Onboarding, &signed_in()), Some(Route::Dashboard));

        let fresh = SessionView {
            is_authenticated: true,
            is_new_user: true,
            ..Default::default()
        };
        assert_eq!(guard(Route::Onboarding, &fresh), None);
    }

    #[test]
    fn fresh_identity_is_sent_to_onboarding() {
        let fresh = SessionView {
            is_authenticated: true,
            is_new_user: true,
            ..Default::default()
        };
        for route in [Route::Root, Route::Dashboard, Route::Login, Route::Register] {
            assert_eq!(guard(route, &fresh), Some(Route::Onboarding));
        }
        assert_eq!(guard(Route::Medicines, &fresh), None);

        let finished = SessionView {
            has_completed_onboarding: true,
            ..fresh
        };
        assert_eq!(guard(Route::Root, &finished), Some(Route::Dashboard));
        assert_eq!(guard(Route::Dashboard, &finished), None);

        let loading = SessionView {
            is_loading: true,
            ..fresh
        };
        assert_eq!(guard(Route::Dashboard, &loading), None);
    }

    #[test]
    fn no_redirect_while_loading() {
        let loading = SessionView {
            is_loading: true,
            ..Default::default()
        };
        assert_eq!(guard(Route::Dashboard, &loading), None);
    }

    #[test]
    fn visit_follows_redirect() {
        let router = Router::default();
        let landed = router.visit(Route::Appointments, &SessionView::default());
        assert_eq!(landed, Route::Login);
        assert_eq!(router.current(), Route::Login);
    }
}
