use std::sync::Arc;
use log::{info, warn};
use uuid::Uuid;

use crate::errors::{ApiError, ApiResult};
use crate::models::{CreateUserRequest, User, UserPatch, UserProfile};
use crate::store::Store;

/// Rules for the user collection: unique email and username, password never
/// returned.
pub struct UserService {
    users: Arc<Store<User>>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<Store<User>>, bcrypt_cost: u32) -> Self {
        Self { users, bcrypt_cost }
    }

    pub fn create_user(&self, mut req: CreateUserRequest) -> ApiResult<UserProfile> {
        // Hash before taking the lock; bcrypt is slow on purpose.
        let password_hash = bcrypt::hash(&req.password, self.bcrypt_cost)?;
        req.password.clear();

        self.users.write(|users| {
            if users.any(|u| u.email == req.email) {
                warn!("Rejected user creation: email {} already in use", req.email);
                return Err(ApiError::conflict("Email already in use"));
            }
            if users.any(|u| u.username == req.username) {
                warn!("Rejected user creation: username {} already taken", req.username);
                return Err(ApiError::conflict("Username already taken"));
            }

            let user = User::new(req, password_hash);
            let profile = UserProfile::from(&user);
            users.insert(user);
            info!("Created user {} ({})", profile.id, profile.username);
            Ok(profile)
        })
    }

    pub fn get_all_users(&self) -> Vec<UserProfile> {
        self.users.read(|users| users.iter().map(UserProfile::from).collect())
    }

    pub fn get_user_by_id(&self, id: Uuid) -> ApiResult<UserProfile> {
        self.users
            .read(|users| users.get(id).map(UserProfile::from))
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    pub fn update_user(&self, id: Uuid, patch: UserPatch) -> ApiResult<UserProfile> {
        self.users.write(|users| {
            let current = users.get(id).ok_or_else(|| ApiError::not_found("User not found"))?;

            if let Some(email) = patch.email.as_ref().filter(|e| **e != current.email) {
                if users.any(|u| u.id != id && u.email == *email) {
                    warn!("Rejected update of user {}: email {} already in use", id, email);
                    return Err(ApiError::conflict("Email already in use"));
                }
            }
            if let Some(username) = patch.username.as_ref().filter(|n| **n != current.username) {
                if users.any(|u| u.id != id && u.username == *username) {
                    warn!("Rejected update of user {}: username {} already taken", id, username);
                    return Err(ApiError::conflict("Username already taken"));
                }
            }

            let user = users.get_mut(id).ok_or_else(|| ApiError::not_found("User not found"))?;
            patch.apply_to(user);
            info!("Updated user {}", id);
            Ok(UserProfile::from(&*user))
        })
    }

    pub fn delete_user(&self, id: Uuid) -> ApiResult<()> {
        self.users
            .write(|users| users.remove(id))
            .map(|user| info!("Deleted user {} ({})", user.id, user.username))
            .ok_or_else(|| ApiError::not_found("User not found"))
    }
}
