// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the backend API.

pub mod card;
pub mod envelope;
pub mod mail;
pub mod order;
pub mod portfolio;
pub mod tokens;
pub mod upload;
pub mod user;

pub use card::{Card, CardForm};
pub use envelope::{ApiErrorBody, ApiResponse, Page};
pub use mail::ContactMessage;
pub use order::{
    Order, OrderRequest, OrderStatus, OrderStatusUpdate, Payment, PaymentMethod, PaymentStatus,
};
pub use portfolio::{
    Education, EducationInput, EntityType, Experience, ExperienceInput, MediaFile, MediaUpload,
    Profile, ProfileInput, Project, ProjectInput, Skill, SkillInput,
};
pub use tokens::{LogoutRequest, RefreshRequest, RefreshResponse, TokenPair};
pub use upload::ImageFile;
pub use user::{AccountVerification, Registration, User, UserUpdate};
