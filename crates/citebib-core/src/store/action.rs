//! Store actions and the reducer that applies them

use chrono::{DateTime, Utc};

use crate::domain::{Citation, CitationStyle, Collaborator, Collection, Record, TagRef};
use crate::merge;

use super::transitions::{self, BibliographyField, NewCitation};

/// One committed transition of the collection
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    CreateBibliography {
        style: CitationStyle,
    },
    UpdateBibliographyField {
        bibliography_id: String,
        field: BibliographyField,
    },
    DeleteBibliography {
        bibliography_id: String,
    },
    AddCitation {
        bibliography_id: String,
        citation: NewCitation,
    },
    SetEditedCitation {
        bibliography_id: String,
        citation_id: String,
    },
    UpdateEditedCitationContent {
        bibliography_id: String,
        content: Record,
    },
    CommitCitation {
        bibliography_id: String,
        citation: Citation,
    },
    ToggleChecked {
        bibliography_id: String,
        citation_id: String,
    },
    ToggleAllChecked {
        bibliography_id: String,
    },
    UncheckAll {
        bibliography_id: String,
    },
    DeleteChecked {
        bibliography_id: String,
    },
    DuplicateChecked {
        bibliography_id: String,
    },
    MoveChecked {
        from_id: String,
        to_id: String,
        citations: Vec<Citation>,
    },
    CopyChecked {
        citations: Vec<Citation>,
    },
    CreateBibliographyFromChecked {
        style: CitationStyle,
        citations: Vec<Citation>,
    },
    DeleteAllBibliographies,
    AddTag {
        bibliography_id: String,
        tag: TagRef,
    },
    RemoveTag {
        bibliography_id: String,
        tag_id: String,
    },
    MergeCollections {
        incoming: Collection,
    },
    EnableCollaboration {
        bibliography_id: String,
        session_id: String,
        admin: Option<Collaborator>,
        password: String,
    },
    ReEnableCollaboration {
        bibliography_id: String,
    },
    DisableCollaboration {
        bibliography_id: String,
    },
}

impl Action {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::CreateBibliography { .. } => "create_bibliography",
            Action::UpdateBibliographyField { .. } => "update_bibliography_field",
            Action::DeleteBibliography { .. } => "delete_bibliography",
            Action::AddCitation { .. } => "add_citation",
            Action::SetEditedCitation { .. } => "set_edited_citation",
            Action::UpdateEditedCitationContent { .. } => "update_edited_citation_content",
            Action::CommitCitation { .. } => "commit_citation",
            Action::ToggleChecked { .. } => "toggle_checked",
            Action::ToggleAllChecked { .. } => "toggle_all_checked",
            Action::UncheckAll { .. } => "uncheck_all",
            Action::DeleteChecked { .. } => "delete_checked",
            Action::DuplicateChecked { .. } => "duplicate_checked",
            Action::MoveChecked { .. } => "move_checked",
            Action::CopyChecked { .. } => "copy_checked",
            Action::CreateBibliographyFromChecked { .. } => "create_bibliography_from_checked",
            Action::DeleteAllBibliographies => "delete_all_bibliographies",
            Action::AddTag { .. } => "add_tag",
            Action::RemoveTag { .. } => "remove_tag",
            Action::MergeCollections { .. } => "merge_collections",
            Action::EnableCollaboration { .. } => "enable_collaboration",
            Action::ReEnableCollaboration { .. } => "re_enable_collaboration",
            Action::DisableCollaboration { .. } => "disable_collaboration",
        }
    }
}

impl Collection {
    /// Apply an action, stamping any modification with the current time
    pub fn apply(&self, action: Action) -> Collection {
        self.apply_at(action, Utc::now())
    }

    /// Apply an action with an explicit clock
    pub fn apply_at(&self, action: Action, now: DateTime<Utc>) -> Collection {
        use transitions as t;

        match action {
            Action::CreateBibliography { style } => t::create_bibliography(self, style, now),
            Action::UpdateBibliographyField {
                bibliography_id,
                field,
            } => t::update_bibliography_field(self, &bibliography_id, field, now),
            Action::DeleteBibliography { bibliography_id } => {
                t::delete_bibliography(self, &bibliography_id)
            }
            Action::AddCitation {
                bibliography_id,
                citation,
            } => t::add_citation(self, &bibliography_id, citation, now),
            Action::SetEditedCitation {
                bibliography_id,
                citation_id,
            } => t::set_edited_citation(self, &bibliography_id, &citation_id),
            Action::UpdateEditedCitationContent {
                bibliography_id,
                content,
            } => t::update_edited_citation_content(self, &bibliography_id, content, now),
            Action::CommitCitation {
                bibliography_id,
                citation,
            } => t::commit_citation(self, &bibliography_id, citation, now),
            Action::ToggleChecked {
                bibliography_id,
                citation_id,
            } => t::toggle_checked(self, &bibliography_id, &citation_id),
            Action::ToggleAllChecked { bibliography_id } => {
                t::toggle_all_checked(self, &bibliography_id)
            }
            Action::UncheckAll { bibliography_id } => t::uncheck_all(self, &bibliography_id),
            Action::DeleteChecked { bibliography_id } => {
                t::delete_checked(self, &bibliography_id, now)
            }
            Action::DuplicateChecked { bibliography_id } => {
                t::duplicate_checked(self, &bibliography_id, now)
            }
            Action::MoveChecked {
                from_id,
                to_id,
                citations,
            } => t::move_checked(self, &from_id, &to_id, &citations, now),
            Action::CopyChecked { citations } => t::copy_checked(self, &citations, now),
            Action::CreateBibliographyFromChecked { style, citations } => {
                t::create_bibliography_from_checked(self, style, &citations, now)
            }
            Action::DeleteAllBibliographies => t::delete_all_bibliographies(),
            Action::AddTag {
                bibliography_id,
                tag,
            } => t::add_tag(self, &bibliography_id, tag, now),
            Action::RemoveTag {
                bibliography_id,
                tag_id,
            } => t::remove_tag(self, &bibliography_id, &tag_id, now),
            Action::MergeCollections { incoming } => merge::merge_collections(self, &incoming),
            Action::EnableCollaboration {
                bibliography_id,
                session_id,
                admin,
                password,
            } => merge::enable_collaboration(self, &bibliography_id, session_id, admin, password),
            Action::ReEnableCollaboration { bibliography_id } => {
                merge::re_enable_collaboration(self, &bibliography_id)
            }
            Action::DisableCollaboration { bibliography_id } => {
                merge::disable_collaboration(self, &bibliography_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordType;

    #[test]
    fn test_apply_at_uses_given_clock() {
        let now = Utc::now();
        let collection = Collection::new().apply_at(
            Action::CreateBibliography {
                style: CitationStyle::default(),
            },
            now,
        );
        assert_eq!(collection.bibliographies()[0].date_created, now);
    }

    #[test]
    fn test_miss_returns_equal_collection() {
        let collection = Collection::new().apply(Action::CreateBibliography {
            style: CitationStyle::default(),
        });
        let next = collection.apply(Action::AddCitation {
            bibliography_id: "missing".to_string(),
            citation: NewCitation::Manual(RecordType::Book),
        });
        assert_eq!(next, collection);
    }

    #[test]
    fn test_action_names_are_snake_case() {
        assert_eq!(Action::DeleteAllBibliographies.name(), "delete_all_bibliographies");
        let action = Action::ToggleAllChecked {
            bibliography_id: "b".to_string(),
        };
        assert_eq!(action.name(), "toggle_all_checked");
    }
}
