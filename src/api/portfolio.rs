// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portfolio sections and their media.
//!
//! Reads are public and keyed by the portfolio owner's user id. Edits act on
//! the logged-in user's own entries and are keyed by entry id.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::models::{
    Education, EducationInput, EntityType, Experience, ExperienceInput, MediaFile, MediaUpload,
    Profile, ProfileInput, Project, ProjectInput, Skill, SkillInput,
};
use crate::services::{AuthRequest, FormPayload};

use super::SmartCardApi;

const PROFILE: &str = "profile";
const SKILL: &str = "skill";
const EDUCATION: &str = "edu";
const PROJECT: &str = "project";
const EXPERIENCE: &str = "exp";

/// Everything shown on a user's public portfolio page.
#[derive(Debug, Clone)]
pub struct Portfolio {
    pub profile: Profile,
    pub skills: Vec<Skill>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub experience: Vec<Experience>,
}

impl SmartCardApi {
    pub async fn public_profile(&self, user_id: u64) -> Result<Profile> {
        self.public_section(PROFILE, user_id).await
    }

    pub async fn public_skills(&self, user_id: u64) -> Result<Vec<Skill>> {
        self.public_section(SKILL, user_id).await
    }

    pub async fn public_education(&self, user_id: u64) -> Result<Vec<Education>> {
        self.public_section(EDUCATION, user_id).await
    }

    pub async fn public_projects(&self, user_id: u64) -> Result<Vec<Project>> {
        self.public_section(PROJECT, user_id).await
    }

    pub async fn public_experience(&self, user_id: u64) -> Result<Vec<Experience>> {
        self.public_section(EXPERIENCE, user_id).await
    }

    /// Fetch all portfolio sections concurrently.
    pub async fn portfolio(&self, user_id: u64) -> Result<Portfolio> {
        let (profile, skills, education, projects, experience) = tokio::try_join!(
            self.public_profile(user_id),
            self.public_skills(user_id),
            self.public_education(user_id),
            self.public_projects(user_id),
            self.public_experience(user_id),
        )?;

        Ok(Portfolio {
            profile,
            skills,
            education,
            projects,
            experience,
        })
    }

    pub async fn create_profile(&self, profile: &ProfileInput) -> Result<Profile> {
        self.create_entry(PROFILE, profile).await
    }

    pub async fn update_profile(&self, profile_id: u64, profile: &ProfileInput) -> Result<Profile> {
        self.update_entry(PROFILE, profile_id, profile).await
    }

    pub async fn create_skill(&self, skill: &SkillInput) -> Result<Skill> {
        self.create_entry(SKILL, skill).await
    }

    pub async fn update_skill(&self, skill_id: u64, skill: &SkillInput) -> Result<Skill> {
        self.update_entry(SKILL, skill_id, skill).await
    }

    pub async fn delete_skill(&self, skill_id: u64) -> Result<()> {
        self.delete_entry(SKILL, skill_id).await
    }

    pub async fn create_education(&self, education: &EducationInput) -> Result<Education> {
        self.create_entry(EDUCATION, education).await
    }

    pub async fn update_education(
        &self,
        edu_id: u64,
        education: &EducationInput,
    ) -> Result<Education> {
        self.update_entry(EDUCATION, edu_id, education).await
    }

    pub async fn delete_education(&self, edu_id: u64) -> Result<()> {
        self.delete_entry(EDUCATION, edu_id).await
    }

    pub async fn create_project(&self, project: &ProjectInput) -> Result<Project> {
        self.create_entry(PROJECT, project).await
    }

    pub async fn update_project(&self, project_id: u64, project: &ProjectInput) -> Result<Project> {
        self.update_entry(PROJECT, project_id, project).await
    }

    pub async fn delete_project(&self, project_id: u64) -> Result<()> {
        self.delete_entry(PROJECT, project_id).await
    }

    pub async fn create_experience(&self, experience: &ExperienceInput) -> Result<Experience> {
        self.create_entry(EXPERIENCE, experience).await
    }

    pub async fn update_experience(
        &self,
        ex_id: u64,
        experience: &ExperienceInput,
    ) -> Result<Experience> {
        self.update_entry(EXPERIENCE, ex_id, experience).await
    }

    pub async fn delete_experience(&self, ex_id: u64) -> Result<()> {
        self.delete_entry(EXPERIENCE, ex_id).await
    }

    /// Media attached to one portfolio entry.
    pub async fn public_media(
        &self,
        entity_type: EntityType,
        entity_id: u64,
    ) -> Result<Vec<MediaFile>> {
        self.public(AuthRequest::get(format!(
            "/media/public/{}/{}",
            entity_type, entity_id
        )))
        .await
    }

    /// Attach a file to a portfolio entry owned by the logged-in user.
    pub async fn upload_media(&self, upload: &MediaUpload) -> Result<MediaFile> {
        let form = FormPayload::new()
            .text("entityType", upload.entity_type.as_str())
            .text("entityId", upload.entity_id.to_string())
            .text("fileType", upload.file_type.clone())
            .text("fileName", upload.file_name.clone())
            .file(
                "imageUrl",
                upload.file_name.clone(),
                upload.file_type.clone(),
                upload.bytes.clone(),
            );

        self.authed(AuthRequest::post("/media").form(form)).await
    }

    pub async fn delete_media(&self, media_id: u64) -> Result<()> {
        self.authed_unit(AuthRequest::delete(format!("/media/{}", media_id))).await
    }

    async fn public_section<T: DeserializeOwned>(&self, section: &str, user_id: u64) -> Result<T> {
        self.public(AuthRequest::get(format!("/{}/public/{}", section, user_id)))
            .await
    }

    async fn create_entry<B, T>(&self, section: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.authed(AuthRequest::post(format!("/{}", section)).json(body)?)
            .await
    }

    async fn update_entry<B, T>(&self, section: &str, id: u64, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.authed(AuthRequest::put(format!("/{}/{}", section, id)).json(body)?)
            .await
    }

    async fn delete_entry(&self, section: &str, id: u64) -> Result<()> {
        self.authed_unit(AuthRequest::delete(format!("/{}/{}", section, id)))
            .await
    }
}
