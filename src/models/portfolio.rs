// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public portfolio records: profile, skills, education, projects,
//! experience and their attached media.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Portfolio section a media file is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// Avatar / hero image
    User,
    #[serde(rename = "PROFILES")]
    Profile,
    Skill,
    Education,
    Project,
    Experience,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::User => "USER",
            EntityType::Profile => "PROFILES",
            EntityType::Skill => "SKILL",
            EntityType::Education => "EDUCATION",
            EntityType::Project => "PROJECT",
            EntityType::Experience => "EXPERIENCE",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    #[serde(alias = "id")]
    pub media_id: u64,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub entity_id: Option<u64>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub update_date: Option<String>,
}

/// File to attach to a portfolio entry.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub entity_type: EntityType,
    pub entity_id: u64,
    /// MIME type, e.g. `image/png`
    pub file_type: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(alias = "id")]
    pub profile_id: u64,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub career: Option<String>,
    #[serde(default)]
    pub hobby: Vec<String>,
    #[serde(default)]
    pub website: Vec<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub skill_id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub edu_id: u64,
    #[serde(default)]
    pub school_name: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Technologies used, free text
    #[serde(default)]
    pub tech: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(alias = "expId")]
    pub ex_id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Body of `POST /profile` and `PUT /profile/{id}`. Unset fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hobby: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

impl ProfileInput {
    pub fn for_user(user_id: u64) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillInput {
    pub name: String,
    /// 0 to 5
    pub level: u8,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationInput {
    pub school_name: String,
    pub degree: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectInput {
    pub title: String,
    pub description: Option<String>,
    pub tech: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceInput {
    pub name: String,
    pub position: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
