//! The full web page rendering.
//!
//! [`render`] produces a complete, valid document synchronously. Widgets
//! that need remote data render a placeholder and register a
//! [`LiveRequest`]; [`InteractiveDocument::enhance`] performs those
//! lookups and re-renders once their results arrive.

use std::collections::HashMap;
use std::sync::LazyLock;

use futures::future::join_all;
use payloads::requests::IssueReference;
use payloads::{Advertisement, Issue};

use crate::RenderContext;
use crate::lookup::{AdLookup, IssueLookup, LookupError};
use crate::node::{Action, Node};
use crate::policy::{Overrides, SurfacePolicy};
use crate::surface::{RenderScope, Surface, sanitize_body};
use crate::widgets::{
    ad, callout, code, embed, iframe, image, paywall, poll, subscribe,
};

pub static POLICY: LazyLock<SurfacePolicy> = LazyLock::new(|| {
    SurfacePolicy::new(
        Surface::Interactive,
        Overrides {
            embed: Some(embed::interactive),
            iframe: Some(iframe::interactive),
            image: Some(image::interactive),
            code: Some(code::interactive),
            poll: Some(poll::interactive),
            paywall: Some(paywall::interactive),
            subscribe_now: Some(subscribe::interactive),
            ad: Some(ad::interactive),
            callout: Some(callout::interactive),
        },
    )
});

/// Client-side state the interactive widgets render from.
#[derive(Debug, Clone, Default)]
pub struct LiveState {
    /// Selected option per poll, by poll index.
    pub polls: HashMap<usize, usize>,
    /// Finished issue lookups. `None` records a failed lookup.
    pub issues: HashMap<IssueReference, Option<Issue>>,
    /// Finished ad lookups per benefit.
    pub ads: HashMap<String, Vec<Advertisement>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveRequest {
    Issue(IssueReference),
    Ads(String),
}

#[derive(Debug)]
pub enum LookupOutcome {
    Issue(IssueReference, Result<Issue, LookupError>),
    Ads(String, Result<Vec<Advertisement>, LookupError>),
}

pub struct InteractiveDocument {
    tree: Node,
    ctx: RenderContext,
    live: LiveState,
    pending: Vec<LiveRequest>,
    mounted: bool,
}

/// Renders an article for the web page.
///
/// An ad seed is fixed on the context if none was given, so re-renders
/// keep showing the same advertisement.
#[tracing::instrument(skip_all, fields(article = %ctx.article.id))]
pub fn render(ctx: &RenderContext) -> InteractiveDocument {
    let mut ctx = ctx.clone();
    ctx.ad_seed.get_or_insert_with(rand::random);
    let live = LiveState::default();
    let (tree, pending) = render_tree(&ctx, &live);
    InteractiveDocument {
        tree,
        ctx,
        live,
        pending,
        mounted: true,
    }
}

fn render_tree(
    ctx: &RenderContext,
    live: &LiveState,
) -> (Node, Vec<LiveRequest>) {
    let policy = &*POLICY;
    let sanitized = sanitize_body(&ctx.article.body, policy, ctx);
    let mut scope = RenderScope::new(ctx, policy, Some(live));
    let tree = scope.resolve(&sanitized);
    (tree, scope.into_requests())
}

impl InteractiveDocument {
    pub fn node(&self) -> &Node {
        &self.tree
    }

    pub fn to_html(&self) -> String {
        self.tree.to_html()
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Lookups the current tree is waiting on.
    pub fn pending_lookups(&self) -> &[LiveRequest] {
        &self.pending
    }

    pub fn selected_option(&self, poll: usize) -> Option<usize> {
        self.live.polls.get(&poll).copied()
    }

    /// Applies an action bound to one of the tree's handlers. Returns
    /// whether the document changed; clipboard and diagram actions are
    /// left to the host.
    pub fn dispatch(&mut self, action: &Action) -> bool {
        if !self.mounted {
            return false;
        }
        match action {
            Action::SelectPollOption { poll, option } => {
                self.live.polls.insert(*poll, *option);
                self.rerender();
                true
            }
            Action::CopyToClipboard(_) | Action::RenderDiagram(_) => false,
        }
    }

    /// Stores a lookup result and re-renders. Results arriving after
    /// [`unmount`](Self::unmount) are discarded.
    pub fn apply(&mut self, outcome: LookupOutcome) -> bool {
        if !self.mounted {
            tracing::debug!("discarding lookup result for unmounted document");
            return false;
        }
        match outcome {
            LookupOutcome::Issue(reference, result) => {
                let issue = result
                    .inspect_err(|e| {
                        tracing::warn!(issue = %reference, "issue lookup failed: {e}")
                    })
                    .ok();
                self.live.issues.insert(reference, issue);
            }
            LookupOutcome::Ads(benefit_id, result) => {
                let ads = result
                    .inspect_err(|e| {
                        tracing::warn!(benefit_id, "ad lookup failed: {e}")
                    })
                    .unwrap_or_default();
                self.live.ads.insert(benefit_id, ads);
            }
        }
        self.rerender();
        true
    }

    /// Runs every pending lookup concurrently and applies the results.
    #[tracing::instrument(skip_all, fields(pending = self.pending.len()))]
    pub async fn enhance<S>(&mut self, services: &S)
    where
        S: IssueLookup + AdLookup,
    {
        let lookups = self.pending.clone().into_iter().map(|request| async move {
            match request {
                LiveRequest::Issue(reference) => {
                    let result = services.lookup_issue(&reference).await;
                    LookupOutcome::Issue(reference, result)
                }
                LiveRequest::Ads(benefit_id) => {
                    let result = services.lookup_ads(&benefit_id).await;
                    LookupOutcome::Ads(benefit_id, result)
                }
            }
        });
        for outcome in join_all(lookups).await {
            self.apply(outcome);
        }
    }

    /// Tears the document down; later lookup results are ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn rerender(&mut self) {
        let (tree, pending) = render_tree(&self.ctx, &self.live);
        self.tree = tree;
        self.pending = pending;
    }
}
