use serde::{Deserialize, Serialize};

use crate::forge::request::{Issue, Milestone, MilestoneState, Release};

#[derive(Debug, Deserialize)]
pub struct GithubMilestone {
    pub number: u64,
    pub title: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct GithubMilestoneRef {
    pub number: u64,
}

#[derive(Debug, Deserialize)]
pub struct GithubLabel {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct GithubIssue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<GithubLabel>,
    #[serde(default)]
    pub milestone: Option<GithubMilestoneRef>,
}

#[derive(Debug, Serialize)]
pub struct MilestoneBody<'a> {
    pub title: &'a str,
}

#[derive(Debug, Serialize)]
pub struct IssueUpdateBody<'a> {
    pub title: &'a str,
    pub milestone: u64,
}

#[derive(Debug, Serialize)]
pub struct NewIssueBody<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub milestone: u64,
    pub labels: &'a [String],
}

impl From<GithubMilestone> for Milestone {
    fn from(value: GithubMilestone) -> Self {
        let state = if value.state.eq_ignore_ascii_case("closed") {
            MilestoneState::Closed
        } else {
            MilestoneState::Open
        };

        Self {
            number: value.number,
            title: value.title,
            state,
        }
    }
}

impl From<GithubIssue> for Issue {
    fn from(value: GithubIssue) -> Self {
        Self {
            number: value.number,
            title: value.title,
            body: value.body.unwrap_or_default(),
            labels: value.labels.into_iter().map(|l| l.name).collect(),
            milestone: value.milestone.map(|m| m.number),
        }
    }
}

impl From<octocrab::models::repos::Release> for Release {
    fn from(value: octocrab::models::repos::Release) -> Self {
        Self {
            id: value.id.into_inner(),
            name: value.name.unwrap_or_default(),
            tag_name: value.tag_name,
            body: value.body.unwrap_or_default(),
            prerelease: value.prerelease,
            draft: value.draft,
        }
    }
}
