use strum::Display;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Snapshot of a release on the forge.
pub struct Release {
    pub id: u64,
    pub name: String,
    pub tag_name: String,
    pub body: String,
    pub prerelease: bool,
    pub draft: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MilestoneState {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A milestone grouping the issues of one release cycle.
pub struct Milestone {
    pub number: u64,
    pub title: String,
    pub state: MilestoneState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// An issue, as far as release bookkeeping cares about it.
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub milestone: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Asset attached to a release after upload.
pub struct Asset {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to rename a release and retag it.
pub struct UpdateReleaseRequest {
    pub release_id: u64,
    pub name: String,
    pub tag_name: String,
    pub prerelease: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to create a new release.
pub struct CreateReleaseRequest {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
}

#[derive(Clone, PartialEq, Eq)]
/// Request to attach a binary file to a release.
pub struct UploadAssetRequest {
    pub release_id: u64,
    pub file_name: String,
    pub data: Vec<u8>,
}

// Asset content is elided so dry-run logging stays readable
impl std::fmt::Debug for UploadAssetRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadAssetRequest")
            .field("release_id", &self.release_id)
            .field("file_name", &self.file_name)
            .field("data", &format_args!("<{} bytes>", self.data.len()))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to rename a milestone.
pub struct UpdateMilestoneRequest {
    pub number: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to open a new milestone.
pub struct CreateMilestoneRequest {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to retitle an issue and move it to a milestone.
pub struct UpdateIssueRequest {
    pub number: u64,
    pub title: String,
    pub milestone: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to open a new issue.
pub struct CreateIssueRequest {
    pub title: String,
    pub body: String,
    pub milestone: u64,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to comment on an issue.
pub struct CreateCommentRequest {
    pub issue_number: u64,
    pub body: String,
}
