//! In-memory stores and request helpers for router tests.

use std::sync::Mutex;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::FromRef,
    http::{header, Method, Request, Response, StatusCode},
};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    auth::jwt::JwtKeys,
    meals::{
        repo::MealStore,
        repo_types::{Meal, MealType, NewMeal},
    },
    state::AppState,
    users::{
        repo::{EmailTaken, UserStore},
        repo_types::{ProfileUpdate, User},
    },
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, name: &str, email: &str, password_hash: &str) -> anyhow::Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(EmailTaken.into());
        }
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            gender: None,
            age: None,
            weight: None,
            height: None,
            activity_level: None,
            daily_calorie_goal: None,
            profile_url: None,
            reminders: false,
            reminder_time: "19:00".into(),
            weekly_report: true,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> anyhow::Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        Ok(users.iter_mut().find(|u| u.id == id).map(|u| {
            update.apply_to(u);
            u.clone()
        }))
    }
}

#[derive(Default)]
pub struct MemoryMealStore {
    meals: Mutex<Vec<Meal>>,
}

fn write_fields(meal: &mut Meal, fields: &NewMeal) {
    meal.name = fields.name.clone();
    meal.description = fields.description.clone();
    meal.calories = fields.calories;
    meal.meal_type = fields.meal_type;
    meal.date = fields.date.clone();
    meal.time = fields.time.clone();
    meal.image = fields.image.clone();
    meal.is_favorite = fields.is_favorite;
}

#[async_trait]
impl MealStore for MemoryMealStore {
    async fn insert(&self, user_id: Uuid, fields: &NewMeal) -> anyhow::Result<Meal> {
        let mut meal = Meal {
            id: Uuid::new_v4(),
            user_id,
            name: String::new(),
            description: String::new(),
            calories: 0,
            meal_type: fields.meal_type,
            date: String::new(),
            time: String::new(),
            image: String::new(),
            is_favorite: false,
            created_at: OffsetDateTime::now_utc(),
        };
        write_fields(&mut meal, fields);
        self.meals.lock().unwrap().push(meal.clone());
        Ok(meal)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meals = self.meals.lock().unwrap();
        Ok(meals.iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let meals = self.meals.lock().unwrap();
        let mut owned: Vec<Meal> = meals.iter().filter(|m| m.user_id == user_id).cloned().collect();
        owned.sort_by(|a, b| {
            (&b.date, &b.time, b.created_at).cmp(&(&a.date, &a.time, a.created_at))
        });
        Ok(owned)
    }

    async fn update(&self, id: Uuid, fields: &NewMeal) -> anyhow::Result<Option<Meal>> {
        let mut meals = self.meals.lock().unwrap();
        Ok(meals.iter_mut().find(|m| m.id == id).map(|m| {
            write_fields(m, fields);
            m.clone()
        }))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut meals = self.meals.lock().unwrap();
        let before = meals.len();
        meals.retain(|m| !(m.id == id && m.user_id == user_id));
        Ok(meals.len() != before)
    }

    async fn toggle_favorite(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let mut meals = self.meals.lock().unwrap();
        Ok(meals
            .iter_mut()
            .find(|m| m.id == id && m.user_id == user_id)
            .map(|m| {
                m.is_favorite = !m.is_favorite;
                m.clone()
            }))
    }
}

pub async fn seed_user(state: &AppState, email: &str) -> User {
    state
        .users
        .create("Ana", email, "not-a-real-hash")
        .await
        .unwrap()
}

/// Inserts a meal as-is, bypassing request validation.
pub async fn seed_meal(
    state: &AppState,
    user_id: Uuid,
    date: &str,
    calories: i32,
    is_favorite: bool,
) -> Meal {
    let meal = NewMeal {
        name: "Salad".into(),
        description: "greens".into(),
        calories,
        meal_type: MealType::Lunch,
        date: date.to_string(),
        time: "12:00".into(),
        image: "placeholder.png".into(),
        is_favorite,
    };
    state.meals.insert(user_id, &meal).await.unwrap()
}

pub fn access_token(state: &AppState, user_id: Uuid) -> String {
    JwtKeys::from_ref(state).sign_access(user_id).unwrap()
}

pub fn refresh_token(state: &AppState, user_id: Uuid) -> String {
    JwtKeys::from_ref(state).sign_refresh(user_id).unwrap()
}

pub async fn send(state: &AppState, req: Request<Body>) -> Response<Body> {
    crate::app::build_app(state.clone())
        .oneshot(req)
        .await
        .unwrap()
}

pub async fn send_json(
    state: &AppState,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send(state, req).await
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

pub async fn call(
    state: &AppState,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let resp = send_json(state, method, uri, token, body).await;
    let status = resp.status();
    (status, body_json(resp).await)
}
