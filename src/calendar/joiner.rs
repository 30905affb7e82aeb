use tracing::{debug, warn};

use crate::core::config::StoryPointsPolicy;
use crate::core::models::{Issue, Sprint, SprintDescriptor, StoryPoints, StoryTotal};


/// Builds one sprint per descriptor, in descriptor order, each owning the
/// issues whose `sprint_id` matches. Issues pointing at an unknown sprint are
/// left out of every sprint.
pub fn join_issues(
    issues: &[Issue],
    descriptors: &[SprintDescriptor],
    policy: StoryPointsPolicy,
) -> Vec<Sprint> {
    descriptors
        .iter()
        .map(|descriptor| {
            let sprint_issues: Vec<Issue> = issues
                .iter()
                .filter(|issue| issue.sprint_id == descriptor.id)
                .cloned()
                .collect();
            let story_total = story_total(&sprint_issues, policy);

            debug!(
                "Sprint {} ({}): {} issues, total {:?}",
                descriptor.id,
                descriptor.name,
                sprint_issues.len(),
                story_total
            );

            Sprint {
                id: descriptor.id,
                name: descriptor.name.clone(),
                start: descriptor.start,
                end: descriptor.end,
                issues: sprint_issues,
                story_total,
            }
        })
        .collect()
}


/// Sum of the issues' story points. A sum that leaves the `i64` range cannot be
/// represented and poisons the total like an unparseable estimate.
pub fn story_total(issues: &[Issue], policy: StoryPointsPolicy) -> StoryTotal {
    let mut total = 0_i64;

    for issue in issues {
        match (&issue.story_points, policy) {
            (StoryPoints::Estimated { points }, _) => match total.checked_add(*points) {
                Some(sum) => total = sum,
                None => {
                    warn!("Story point total overflowed at issue {:?}", issue.id);
                    return StoryTotal::Poisoned;
                }
            },
            (StoryPoints::Unparseable { .. }, StoryPointsPolicy::TreatAsZero) => {}
            (StoryPoints::Unparseable { .. }, StoryPointsPolicy::Poison) => {
                return StoryTotal::Poisoned;
            }
        }
    }

    StoryTotal::Points(total)
}


/// Issues that no sprint in `sprints` claimed.
pub fn orphaned_issues<'a>(issues: &'a [Issue], sprints: &[Sprint]) -> Vec<&'a Issue> {
    issues
        .iter()
        .filter(|issue| !sprints.iter().any(|sprint| sprint.id == issue.sprint_id))
        .collect()
}
