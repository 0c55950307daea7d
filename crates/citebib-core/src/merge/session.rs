//! Collaborative session transitions on a single bibliography

use crate::domain::{CollabSession, Collaborator, Collection};
use crate::store::transitions::update_bibliography;

/// Open a new session with `admin` as the only collaborator.
///
/// Without an admin identity nothing changes.
pub fn enable_collaboration(
    collection: &Collection,
    bibliography_id: &str,
    session_id: String,
    admin: Option<Collaborator>,
    password: String,
) -> Collection {
    let Some(admin) = admin else {
        return collection.clone();
    };
    update_bibliography(collection, bibliography_id, |bib| {
        bib.collab = Some(CollabSession::open_with_admin(session_id, admin, password));
    })
}

/// Reopen an existing session; roster and change log are kept
pub fn re_enable_collaboration(collection: &Collection, bibliography_id: &str) -> Collection {
    update_bibliography(collection, bibliography_id, |bib| {
        if let Some(collab) = bib.collab.as_mut() {
            collab.open = true;
        }
    })
}

/// Close the session, shrinking the roster to the admin and clearing the
/// change log
pub fn disable_collaboration(collection: &Collection, bibliography_id: &str) -> Collection {
    update_bibliography(collection, bibliography_id, |bib| {
        if let Some(collab) = bib.collab.as_mut() {
            collab.open = false;
            let admin_id = collab.admin_id.clone();
            collab.collaborators.retain(|c| c.id == admin_id);
            collab.changelog.clear();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bibliography, CitationStyle};
    use chrono::Utc;

    fn single() -> Collection {
        Collection::from(vec![Bibliography::new(
            "bib".to_string(),
            CitationStyle::default(),
            Utc::now(),
        )])
    }

    #[test]
    fn test_enable_requires_admin() {
        let collection = single();
        let next = enable_collaboration(&collection, "bib", "s1".to_string(), None, String::new());
        assert_eq!(next, collection);
    }

    #[test]
    fn test_enable_sets_admin_as_sole_collaborator() {
        let admin = Collaborator::new("Ada", "u1");
        let next = enable_collaboration(
            &single(),
            "bib",
            "s1".to_string(),
            Some(admin.clone()),
            "pw".to_string(),
        );
        let collab = next.get("bib").unwrap().collab.clone().unwrap();
        assert!(collab.open);
        assert_eq!(collab.admin_id, "u1");
        assert_eq!(collab.collaborators, vec![admin]);
        assert!(collab.changelog.is_empty());
        assert_eq!(collab.password, "pw");
    }

    #[test]
    fn test_disable_then_re_enable() {
        let admin = Collaborator::new("Ada", "u1");
        let mut collection =
            enable_collaboration(&single(), "bib", "s1".to_string(), Some(admin.clone()), String::new());
        {
            let collab = collection.bibliographies_mut()[0].collab.as_mut().unwrap();
            collab.collaborators.push(Collaborator::new("Grace", "u2"));
            collab.changelog.push(serde_json::json!({"op": "edit"}));
        }

        let closed = disable_collaboration(&collection, "bib");
        let collab = closed.get("bib").unwrap().collab.clone().unwrap();
        assert!(!collab.open);
        assert_eq!(collab.collaborators, vec![admin.clone()]);
        assert!(collab.changelog.is_empty());

        let reopened = re_enable_collaboration(&closed, "bib");
        let collab = reopened.get("bib").unwrap().collab.clone().unwrap();
        assert!(collab.open);
        assert_eq!(collab.collaborators, vec![admin]);
    }

    #[test]
    fn test_session_ops_without_session_are_noops() {
        let collection = single();
        assert_eq!(re_enable_collaboration(&collection, "bib"), collection);
        assert_eq!(disable_collaboration(&collection, "bib"), collection);
    }
}
