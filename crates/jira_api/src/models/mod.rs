mod board;
mod comment;
mod issue;
mod timesheet;
mod transition;
mod worklog;

pub use board::{BacklogData, RapidView, RapidViewsResponse, Sprint, SprintIssue};
pub use comment::{Comment, CommentRequest, CommentsResponse, Visibility, VisibilityRequest};
pub use issue::{Issue, IssueFields, IssuesResponse, NamedEntity, TimeTracking, UserRef};
pub use timesheet::{TimesheetEntry, TimesheetIssue, TimesheetResponse};
pub use transition::{Transition, TransitionTarget, TransitionsResponse};
pub use worklog::{Worklog, WorklogPayload, WorklogsResponse};
