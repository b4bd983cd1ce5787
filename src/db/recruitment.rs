use super::schema::RECRUITMENT_INTERVIEWS;
use crate::api::{Backend, Filter, Query};
use crate::libs::messages::Message;
use crate::libs::validation;
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// Pipeline position of a candidate.
///
/// Candidates only move forward: `applied → screening → interview → offer → hired`,
/// and may be rejected from any stage that is not final.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Applied,
    Screening,
    Interview,
    Offer,
    Hired,
    Rejected,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Applied,
        Stage::Screening,
        Stage::Interview,
        Stage::Offer,
        Stage::Hired,
        Stage::Rejected,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Hired | Stage::Rejected)
    }

    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Applied => Some(Stage::Screening),
            Stage::Screening => Some(Stage::Interview),
            Stage::Interview => Some(Stage::Offer),
            Stage::Offer => Some(Stage::Hired),
            Stage::Hired | Stage::Rejected => None,
        }
    }

    pub fn can_move_to(&self, to: Stage) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Stage::Rejected || to > *self
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Applied => "applied",
            Stage::Screening => "screening",
            Stage::Interview => "interview",
            Stage::Offer => "offer",
            Stage::Hired => "hired",
            Stage::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.to_string() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown stage '{}'", s.trim()))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub candidate_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub position: String,
    pub stage: Stage,
    #[serde(default)]
    pub interview_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub interviewer: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct CandidateInput {
    pub candidate_name: String,
    pub email: Option<String>,
    pub position: String,
    pub interview_at: Option<String>,
    pub interviewer: Option<String>,
    pub notes: Option<String>,
}

pub struct Recruitment<'a, B: Backend> {
    backend: &'a B,
}

impl<'a, B: Backend> Recruitment<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub async fn add(&self, input: &CandidateInput, now: DateTime<Utc>) -> Result<Candidate> {
        let email = match validation::optional(input.email.as_deref()) {
            Some(email) => Some(validation::email(&email)?),
            None => None,
        };
        let interview_at = match validation::optional(input.interview_at.as_deref()) {
            Some(at) => Some(validation::datetime("interview_at", &at)?),
            None => None,
        };
        let candidate = Candidate {
            id: None,
            candidate_name: validation::required("candidate_name", &input.candidate_name)?,
            email,
            position: validation::required("position", &input.position)?,
            stage: Stage::Applied,
            interview_at,
            interviewer: validation::optional(input.interviewer.as_deref()),
            rating: None,
            notes: validation::optional(input.notes.as_deref()),
            created_at: now,
        };
        Ok(self.backend.create(RECRUITMENT_INTERVIEWS, &candidate).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Candidate>> {
        Ok(self.backend.fetch_one(Query::table(RECRUITMENT_INTERVIEWS).filter(Filter::eq("id", id))).await?)
    }

    pub async fn list(&self, stage: Option<Stage>) -> Result<Vec<Candidate>> {
        let mut query = Query::table(RECRUITMENT_INTERVIEWS).order_desc("created_at");
        if let Some(stage) = stage {
            query = query.filter(Filter::eq("stage", stage.to_string()));
        }
        Ok(self.backend.fetch(&query).await?)
    }

    /// Interviews scheduled within `[from, to)`.
    pub async fn interviews_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Candidate>> {
        let query = Query::table(RECRUITMENT_INTERVIEWS)
            .filter(Filter::gte("interview_at", format!("{}T00:00:00", from)))
            .filter(Filter::lt("interview_at", format!("{}T00:00:00", to)))
            .order_asc("interview_at");
        Ok(self.backend.fetch(&query).await?)
    }

    pub async fn advance(&self, id: i64, to: Stage) -> Result<Candidate> {
        let mut candidate = self.require(id).await?;
        if !candidate.stage.can_move_to(to) {
            msg_bail_anyhow!(Message::InvalidStageTransition(candidate.stage.to_string(), to.to_string()));
        }
        self.backend
            .update(RECRUITMENT_INTERVIEWS, &[Filter::eq("id", id)], json!({ "stage": to }))
            .await?;
        candidate.stage = to;
        Ok(candidate)
    }

    pub async fn schedule_interview(&self, id: i64, at: &str, interviewer: Option<&str>) -> Result<Candidate> {
        let mut candidate = self.require(id).await?;
        candidate.interview_at = Some(validation::datetime("interview_at", at)?);
        if let Some(interviewer) = validation::optional(interviewer) {
            candidate.interviewer = Some(interviewer);
        }
        let patch = json!({
            "interview_at": candidate.interview_at,
            "interviewer": candidate.interviewer,
        });
        self.backend.update(RECRUITMENT_INTERVIEWS, &[Filter::eq("id", id)], patch).await?;
        Ok(candidate)
    }

    /// Stores a 1 to 5 rating, replacing the notes when new ones are given.
    pub async fn rate(&self, id: i64, rating: u8, notes: Option<&str>) -> Result<Candidate> {
        let rating = validation::in_range("rating", rating, 1, 5)?;
        let mut candidate = self.require(id).await?;

        let mut patch = Map::new();
        patch.insert("rating".to_string(), Value::from(rating));
        if let Some(notes) = validation::optional(notes) {
            patch.insert("notes".to_string(), Value::from(notes.clone()));
            candidate.notes = Some(notes);
        }
        self.backend
            .update(RECRUITMENT_INTERVIEWS, &[Filter::eq("id", id)], Value::Object(patch))
            .await?;
        candidate.rating = Some(rating);
        Ok(candidate)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.backend.delete(RECRUITMENT_INTERVIEWS, &[Filter::eq("id", id)]).await? == 0 {
            msg_bail_anyhow!(Message::CandidateNotFound(id));
        }
        Ok(())
    }

    /// Candidate count for every stage, in pipeline order.
    pub async fn overview(&self) -> Result<Vec<(Stage, usize)>> {
        Ok(count_by_stage(&self.list(None).await?))
    }

    async fn require(&self, id: i64) -> Result<Candidate> {
        match self.get(id).await? {
            Some(candidate) => Ok(candidate),
            None => msg_bail_anyhow!(Message::CandidateNotFound(id)),
        }
    }
}

pub fn count_by_stage(candidates: &[Candidate]) -> Vec<(Stage, usize)> {
    Stage::ALL
        .into_iter()
        .map(|stage| (stage, candidates.iter().filter(|c| c.stage == stage).count()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_move_forward_or_to_rejected() {
        assert!(Stage::Applied.can_move_to(Stage::Screening));
        assert!(Stage::Applied.can_move_to(Stage::Offer));
        assert!(Stage::Interview.can_move_to(Stage::Rejected));
        assert!(!Stage::Offer.can_move_to(Stage::Screening));
        assert!(!Stage::Interview.can_move_to(Stage::Interview));
    }

    #[test]
    fn terminal_stages_are_final() {
        for to in Stage::ALL {
            assert!(!Stage::Hired.can_move_to(to));
            assert!(!Stage::Rejected.can_move_to(to));
        }
        assert_eq!(Stage::Offer.next(), Some(Stage::Hired));
        assert_eq!(Stage::Hired.next(), None);
    }

    #[test]
    fn stage_parses_case_insensitively() {
        assert_eq!("Interview".parse::<Stage>().unwrap(), Stage::Interview);
        assert!("onboarding".parse::<Stage>().is_err());
    }
}
