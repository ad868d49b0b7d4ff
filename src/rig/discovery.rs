//! Bounded, non-blocking body-part discovery.
//!
//! Parts of a freshly spawned entity often stream in over several frames.
//! [`PartDiscovery`] is polled once per frame instead of blocking: each poll
//! looks up every still-missing part by its primary name. Once the wait has
//! expired, each missing part gets a single lookup under its fallback name;
//! whatever is still missing after that fails the discovery.

use std::task::Poll;
use std::time::{Duration, Instant};

use hashbrown::HashMap;
use log::{debug, trace};

use crate::error::OverlayError;
use crate::host::{EntityId, PartHandle, SceneQuery};

use super::parts::{BodyPart, PartNames, ResolvedParts};

/// Timed wait for the body parts of one entity.
#[derive(Debug, Clone)]
pub struct PartDiscovery {
    entity: EntityId,
    started: Instant,
    timeout: Duration,
    found: HashMap<BodyPart, PartHandle>,
}

impl PartDiscovery {
    /// Starts waiting for `entity`'s parts at `started`.
    #[must_use]
    pub fn new(entity: EntityId, started: Instant, timeout: Duration) -> Self {
        Self {
            entity,
            started,
            timeout,
            found: HashMap::new(),
        }
    }

    /// Entity being discovered.
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        self.entity
    }

    /// Whether the primary-name wait has run out at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.timeout
    }

    /// Number of parts found so far.
    #[must_use]
    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    /// Advances the wait.
    ///
    /// Returns `Poll::Pending` while parts are missing and the wait has time
    /// left, `Poll::Ready(Ok(_))` once every part is found and
    /// `Poll::Ready(Err(OverlayError::PartNotFound { .. }))` when a part is
    /// missing under both names after the wait.
    pub fn poll(
        &mut self,
        scene: &dyn SceneQuery,
        names: &PartNames,
        now: Instant,
    ) -> Poll<Result<ResolvedParts, OverlayError>> {
        for part in BodyPart::ALL {
            if self.found.contains_key(&part) {
                continue;
            }
            if let Some(handle) = scene.find_part(self.entity, &names.get(part).primary) {
                trace!("entity {}: found {part}", self.entity);
                self.found.insert(part, handle);
            }
        }

        if let Some(parts) = self.resolved() {
            return Poll::Ready(Ok(parts));
        }
        if !self.is_expired(now) {
            return Poll::Pending;
        }

        for part in BodyPart::ALL {
            if self.found.contains_key(&part) {
                continue;
            }
            let name = names.get(part);
            let fallback = name
                .fallback
                .as_deref()
                .and_then(|fallback| scene.find_part(self.entity, fallback));
            let Some(handle) = fallback else {
                return Poll::Ready(Err(OverlayError::PartNotFound {
                    entity: self.entity,
                    part,
                    tried: name.candidates(),
                }));
            };
            debug!("entity {}: using fallback name for {part}", self.entity);
            self.found.insert(part, handle);
        }

        Poll::Ready(self.resolved().ok_or_else(|| OverlayError::PartNotFound {
            entity: self.entity,
            part: BodyPart::Root,
            tried: names.root.candidates(),
        }))
    }

    fn resolved(&self) -> Option<ResolvedParts> {
        ResolvedParts::from_lookup(|part| self.found.get(&part).copied())
    }
}
