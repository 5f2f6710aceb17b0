//! Actions applied to every selected row of a list at once.

use serde_json::json;

use crate::{
    resource::{paths, BodyStyle, Endpoint, EntityKind, HttpMethod},
    submit::RequestBody,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkAction {
    Publish,
    Unpublish,
    Activate,
    Deactivate,
}

impl BulkAction {
    /// Bulk actions offered above the table of `kind`.
    pub fn for_kind(kind: EntityKind) -> &'static [BulkAction] {
        match kind {
            EntityKind::Result => &[BulkAction::Publish, BulkAction::Unpublish],
            EntityKind::Admin => &[BulkAction::Activate, BulkAction::Deactivate],
            _ => &[],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BulkAction::Publish => "Publish selected",
            BulkAction::Unpublish => "Unpublish selected",
            BulkAction::Activate => "Activate selected",
            BulkAction::Deactivate => "Deactivate selected",
        }
    }

    pub fn confirmation_text(self, count: usize) -> String {
        let verb = match self {
            BulkAction::Publish => "publish",
            BulkAction::Unpublish => "unpublish",
            BulkAction::Activate => "activate",
            BulkAction::Deactivate => "deactivate",
        };
        format!("Are you sure you want to {verb} {count} selected item(s)?")
    }

    /// Endpoint and body for `ids`. Results take a JSON list, admins a
    /// form with one `admin_ids` pair per id.
    pub fn request(self, ids: &[String]) -> (Endpoint, RequestBody) {
        match self {
            BulkAction::Publish | BulkAction::Unpublish => (
                Endpoint::post_json(paths::PUBLISH_BULK),
                RequestBody::Json(json!({
                    "result_ids": ids,
                    "publish": self == BulkAction::Publish,
                })),
            ),
            BulkAction::Activate | BulkAction::Deactivate => {
                let mut pairs: Vec<(String, String)> = ids
                    .iter()
                    .map(|id| ("admin_ids".to_string(), id.clone()))
                    .collect();
                let action = if self == BulkAction::Activate {
                    "activate"
                } else {
                    "deactivate"
                };
                pairs.push(("action".to_string(), action.to_string()));
                (
                    Endpoint::new(
                        HttpMethod::Post,
                        paths::ADMIN_BULK_STATUS.to_string(),
                        BodyStyle::Form,
                    ),
                    RequestBody::Form(pairs),
                )
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_sends_ids_and_flag_as_json() {
        let ids = vec!["a".to_string(), "b".to_string()];
        let (endpoint, body) = BulkAction::Unpublish.request(&ids);
        assert_eq!(endpoint.path, paths::PUBLISH_BULK);
        assert_eq!(
            body,
            RequestBody::Json(json!({"result_ids": ["a", "b"], "publish": false}))
        );
    }

    #[test]
    fn admin_status_repeats_the_id_field() {
        let ids = vec!["3".to_string(), "9".to_string()];
        let (endpoint, body) = BulkAction::Activate.request(&ids);
        assert_eq!(endpoint.method, HttpMethod::Post);
        assert_eq!(endpoint.body, BodyStyle::Form);
        assert_eq!(
            body,
            RequestBody::Form(vec![
                ("admin_ids".to_string(), "3".to_string()),
                ("admin_ids".to_string(), "9".to_string()),
                ("action".to_string(), "activate".to_string()),
            ])
        );
    }

    #[test]
    fn only_results_and_admins_have_bulk_actions() {
        for kind in EntityKind::ALL {
            let offered = !BulkAction::for_kind(kind).is_empty();
            assert_eq!(offered, matches!(kind, EntityKind::Result | EntityKind::Admin));
        }
    }
}
