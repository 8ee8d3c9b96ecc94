//! In-memory stores and request helpers for router tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    auth::{
        repo::{AddUserError, CredentialStore},
        repo_types::{User, ROLE_USER},
    },
    bookings::{
        repo::BookingStore,
        repo_types::{Booking, NewBooking},
    },
    catalog::repo::{Catalog, Trainer, TrainerClass},
};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    bookings: Vec<Booking>,
    next_booking_id: i32,
    trainers: Vec<Trainer>,
    dashboard_link: Option<String>,
    bookings_down: bool,
}

/// One shared in-memory database backing every store trait.
#[derive(Clone, Default)]
pub struct MemoryDb {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryDb {
    /// A database with one trainer and class, as the migrations seed.
    pub fn seeded() -> Self {
        let db = Self::default();
        db.inner.lock().unwrap().trainers.push(Trainer {
            id: "ann".into(),
            name: "Ann Lee".into(),
            specialty: Some("Yoga".into()),
            image_url: None,
            classes: vec![TrainerClass {
                id: "ann-yoga".into(),
                trainer_id: "ann".into(),
                name: "Yoga Flow".into(),
                price: 1500,
                schedule: vec!["13:30–15:00".into()],
            }],
        });
        db
    }

    pub fn set_role(&self, id: Uuid, role: &str) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(u) = inner.users.iter_mut().find(|u| u.id == id) {
            u.role = role.into();
        }
    }

    pub fn user_id(&self, name: &str) -> Option<Uuid> {
        let inner = self.inner.lock().unwrap();
        inner.users.iter().find(|u| u.name == name).map(|u| u.id)
    }

    pub fn set_dashboard_link(&self, link: &str) {
        self.inner.lock().unwrap().dashboard_link = Some(link.into());
    }

    /// Every booking store call fails from now on.
    pub fn fail_bookings(&self) {
        self.inner.lock().unwrap().bookings_down = true;
    }
}

impl Inner {
    fn bookings_up(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.bookings_down, "booking store unavailable");
        Ok(())
    }
}

fn newest_first(mut rows: Vec<Booking>) -> Vec<Booking> {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    rows
}

#[async_trait]
impl CredentialStore for MemoryDb {
    async fn insert_user(
        &self,
        name: &str,
        password_hash: &str,
        phone: Option<&str>,
    ) -> Result<Uuid, AddUserError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.name == name) {
            return Err(AddUserError::NameTaken);
        }
        let id = Uuid::new_v4();
        inner.users.push(User {
            id,
            name: name.into(),
            password_hash: password_hash.into(),
            phone: phone.map(str::to_owned),
            role: ROLE_USER.into(),
        });
        Ok(id)
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.name == name).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl BookingStore for MemoryDb {
    async fn add_booking(&self, b: NewBooking) -> anyhow::Result<i32> {
        let mut inner = self.inner.lock().unwrap();
        inner.bookings_up()?;
        if let Some(uid) = b.user_id {
            anyhow::ensure!(
                inner.users.iter().any(|u| u.id == uid),
                "booking references unknown user {uid}"
            );
        }
        inner.next_booking_id += 1;
        let id = inner.next_booking_id;
        let now = OffsetDateTime::now_utc();
        inner.bookings.push(Booking {
            id,
            user_id: b.user_id,
            name: b.name,
            trainer: b.trainer,
            class: b.class,
            price: b.price,
            created_at: b.created_at.unwrap_or(now),
            booked_time: b.booked_time.unwrap_or(now),
        });
        Ok(id)
    }

    async fn list_bookings(&self) -> anyhow::Result<Vec<Booking>> {
        let inner = self.inner.lock().unwrap();
        inner.bookings_up()?;
        Ok(newest_first(inner.bookings.clone()))
    }

    async fn list_user_bookings(&self, user_id: Uuid) -> anyhow::Result<Vec<Booking>> {
        let inner = self.inner.lock().unwrap();
        inner.bookings_up()?;
        let rows = inner
            .bookings
            .iter()
            .filter(|b| b.user_id == Some(user_id))
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn delete_booking(&self, id: i32, user_id: Uuid) -> anyhow::Result<u64> {
        let mut inner = self.inner.lock().unwrap();
        inner.bookings_up()?;
        let before = inner.bookings.len();
        inner
            .bookings
            .retain(|b| !(b.id == id && b.user_id == Some(user_id)));
        Ok((before - inner.bookings.len()) as u64)
    }
}

#[async_trait]
impl Catalog for MemoryDb {
    async fn list_trainers(&self) -> anyhow::Result<Vec<Trainer>> {
        Ok(self.inner.lock().unwrap().trainers.clone())
    }

    async fn dashboard_link(&self) -> anyhow::Result<Option<String>> {
        Ok(self.inner.lock().unwrap().dashboard_link.clone())
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    request(Method::GET, uri, cookie, Body::empty())
}

pub fn delete_req(uri: &str, cookie: Option<&str>) -> Request<Body> {
    request(Method::DELETE, uri, cookie, Body::empty())
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut req = request(Method::POST, uri, cookie, Body::from(body.to_owned()));
    req.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/x-www-form-urlencoded"),
    );
    req
}

pub fn post_json(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut req = request(Method::POST, uri, cookie, Body::from(body.to_owned()));
    req.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    req
}

fn request(method: Method, uri: &str, cookie: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(body).unwrap()
}

pub async fn body_string(res: Response) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `name=value` part of the response's `Set-Cookie`, ready for a `Cookie` header.
fn cookie_pair(res: &Response) -> String {
    let set = res.headers()[header::SET_COOKIE].to_str().unwrap();
    set.split(';').next().unwrap().to_owned()
}

async fn session_via(app: &Router, uri: &str, name: &str, password: &str) -> String {
    let body = format!(
        "name={}&password={}",
        urlencoding::encode(name),
        urlencoding::encode(password)
    );
    let res = app.clone().oneshot(post_form(uri, &body, None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER, "{uri} for {name}");
    cookie_pair(&res)
}

pub async fn signup_cookie(app: &Router, name: &str, password: &str) -> String {
    session_via(app, "/signup", name, password).await
}

pub async fn login_cookie(app: &Router, name: &str, password: &str) -> String {
    session_via(app, "/login", name, password).await
}
