use std::sync::Arc;

use dashmap::DashMap;

use crate::engine::{CheckoutPolicy, Engine, EngineError};
use crate::limits::*;
use crate::notify::NotifyHub;

/// Manages per-property engines. Each hotel/villa brand gets its own
/// isolated Engine + notify hub, keyed by property slug.
pub struct PropertyDirectory {
    engines: DashMap<String, Arc<Engine>>,
    default_policy: CheckoutPolicy,
}

impl PropertyDirectory {
    pub fn new(default_policy: CheckoutPolicy) -> Self {
        Self {
            engines: DashMap::new(),
            default_policy,
        }
    }

    /// Get or lazily create an engine for the given property, using the
    /// directory-wide checkout policy.
    pub fn get_or_create(&self, slug: &str) -> Result<Arc<Engine>, EngineError> {
        self.get_or_create_with_policy(slug, self.default_policy)
    }

    /// Same, with a per-property checkout policy (hotels with a non-noon
    /// checkout hour). The policy only applies on first creation.
    pub fn get_or_create_with_policy(
        &self,
        slug: &str,
        policy: CheckoutPolicy,
    ) -> Result<Arc<Engine>, EngineError> {
        let safe_slug = sanitize_slug(slug)?;
        if let Some(engine) = self.engines.get(&safe_slug) {
            return Ok(engine.value().clone());
        }
        if self.engines.len() >= MAX_PROPERTIES {
            return Err(EngineError::LimitExceeded("too many properties"));
        }

        let notify = Arc::new(NotifyHub::new());
        let engine = Arc::new(Engine::new(policy, notify));
        self.engines.insert(safe_slug, engine.clone());
        metrics::gauge!(crate::observability::PROPERTIES_ACTIVE).set(self.engines.len() as f64);
        Ok(engine)
    }
}

/// Property slugs come from URLs and admin input — keep only the
/// filename-ish characters and bound the length.
fn sanitize_slug(slug: &str) -> Result<String, EngineError> {
    if slug.len() > MAX_PROPERTY_SLUG_LEN {
        return Err(EngineError::LimitExceeded("property slug too long"));
    }
    let safe: String = slug
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if safe.is_empty() {
        return Err(EngineError::LimitExceeded("empty property slug"));
    }
    Ok(safe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StayStatus;
    use chrono::NaiveDate;
    use ulid::Ulid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[tokio::test]
    async fn property_isolation() {
        let dir = PropertyDirectory::new(CheckoutPolicy::default());

        let eng_a = dir.get_or_create("seaside-villa").unwrap();
        let eng_b = dir.get_or_create("city-hotel").unwrap();

        let room_id = Ulid::new();

        // Create the same room type id in both properties
        eng_a.add_room_type(room_id, "Deluxe".into(), 5, 2, 180.0).await.unwrap();
        eng_b.add_room_type(room_id, "Deluxe".into(), 2, 2, 120.0).await.unwrap();

        eng_a
            .record_stay(crate::model::StayInterval {
                id: Ulid::new(),
                booking_id: Ulid::new(),
                room_id,
                check_in: d(2025, 3, 10),
                check_out: d(2025, 3, 12),
                status: StayStatus::Confirmed,
                guest: None,
            })
            .await
            .unwrap();

        // Property A lost a room on the 10th; property B is untouched.
        let a = eng_a.availability_on(room_id, d(2025, 3, 10)).await.unwrap();
        assert_eq!(a.available, 4);
        let b = eng_b.availability_on(room_id, d(2025, 3, 10)).await.unwrap();
        assert_eq!(b.available, 2);
    }

    #[tokio::test]
    async fn same_engine_returned() {
        let dir = PropertyDirectory::new(CheckoutPolicy::default());
        let eng1 = dir.get_or_create("grand-palms").unwrap();
        let eng2 = dir.get_or_create("grand-palms").unwrap();
        assert!(Arc::ptr_eq(&eng1, &eng2));
    }

    #[tokio::test]
    async fn slug_sanitized() {
        let dir = PropertyDirectory::new(CheckoutPolicy::default());
        // Junk characters are stripped; "../evil" and "evil" collide.
        let eng1 = dir.get_or_create("../evil").unwrap();
        let eng2 = dir.get_or_create("evil").unwrap();
        assert!(Arc::ptr_eq(&eng1, &eng2));

        let result = dir.get_or_create("../..");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn slug_too_long() {
        let dir = PropertyDirectory::new(CheckoutPolicy::default());
        let long = "x".repeat(MAX_PROPERTY_SLUG_LEN + 1);
        assert!(dir.get_or_create(&long).is_err());
        let at_limit = "x".repeat(MAX_PROPERTY_SLUG_LEN);
        assert!(dir.get_or_create(&at_limit).is_ok());
    }

    #[tokio::test]
    async fn property_count_limit() {
        let dir = PropertyDirectory::new(CheckoutPolicy::default());
        for i in 0..MAX_PROPERTIES {
            dir.get_or_create(&format!("p{i}")).unwrap();
        }
        let result = dir.get_or_create("one-more");
        assert!(matches!(result, Err(EngineError::LimitExceeded(_))));
    }

    #[tokio::test]
    async fn per_property_policy() {
        let dir = PropertyDirectory::new(CheckoutPolicy::default());
        let early = CheckoutPolicy::from_hour(10).unwrap();
        let eng = dir.get_or_create_with_policy("early-bird-inn", early).unwrap();
        assert_eq!(*eng.policy(), early);
    }
}
