//! # Rule Context
//!
//! What the evaluator needs to know about the request it runs in: the
//! visitor session and the site. Hosts pass their own context type as long
//! as it implements [`RuleContext`]; [`EvaluationContext`] is the plain one.

use cartrule_core::{Session, SiteContext};

/// Session and site accessors the evaluator reads.
pub trait RuleContext {
    /// The visitor session. Always present.
    fn session(&self) -> &Session;

    /// The evaluating site, or `None` when the host could not determine it.
    fn site(&self) -> Option<&SiteContext>;
}

/// A concrete [`RuleContext`] built from explicit values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationContext {
    pub session: Session,
    pub site: Option<SiteContext>,
}

impl EvaluationContext {
    pub fn new(session: Session, site: SiteContext) -> Self {
        EvaluationContext {
            session,
            site: Some(site),
        }
    }

    /// A context whose site could not be determined.
    pub fn without_site(session: Session) -> Self {
        EvaluationContext {
            session,
            site: None,
        }
    }
}

impl RuleContext for EvaluationContext {
    fn session(&self) -> &Session {
        &self.session
    }

    fn site(&self) -> Option<&SiteContext> {
        self.site.as_ref()
    }
}

impl<C: RuleContext + ?Sized> RuleContext for &C {
    fn session(&self) -> &Session {
        (**self).session()
    }

    fn site(&self) -> Option<&SiteContext> {
        (**self).site()
    }
}
