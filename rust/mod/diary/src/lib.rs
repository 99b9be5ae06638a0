//! Food diary module: restaurant visit posts, likes, follows and the XP /
//! level / title progression that rewards them.
//!
//! # Resources
//!
//! - **Post**: one restaurant visit with ratings, spend and a review
//! - **Like**: article or review like, one per (post, user, kind)
//! - **Follow**: directed user → user edge
//! - **Profile**: per-user XP plus editable profile fields
//!
//! Level and title are never stored; they are derived from XP on read
//! (see [`progression`]).
//!
//! # Usage
//!
//! ```ignore
//! use diary::{DiaryModule, service::DiaryService};
//!
//! let svc = DiaryService::open(&config, "http://localhost:8080/blobs")?;
//! let module = DiaryModule::new(svc, Arc::new(JwtIdentity::new(secret, ttl)));
//! let router = module.routes(); // Mount at the root
//! ```

pub mod api;
pub mod model;
pub mod progression;
pub mod service;

use std::sync::Arc;

use axum::Router;

use foodlog_core::{IdentityProvider, Module};

use crate::service::DiaryService;

/// Diary module implementing the Module trait.
pub struct DiaryModule {
    service: Arc<DiaryService>,
    identity: Arc<dyn IdentityProvider>,
}

impl DiaryModule {
    pub fn new(service: Arc<DiaryService>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { service, identity }
    }
}

impl Module for DiaryModule {
    fn name(&self) -> &str {
        "diary"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone(), self.identity.clone())
    }
}
