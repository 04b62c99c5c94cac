use crate::api::BookingApi;
use crate::models::Property;
use crate::views::Loaded;
use tracing::{error, info};

const LOAD_FAILED: &str = "Unable to load properties. Please try again later.";

/// All listings, fetched once and filtered locally
#[derive(Debug)]
pub struct ListingView {
    properties: Vec<Property>,
}

impl ListingView {
    pub async fn load(api: &dyn BookingApi) -> Loaded<Self> {
        match api.list_properties().await {
            Ok(properties) => {
                info!(count = properties.len(), "Loaded properties");
                Loaded::Ready(Self { properties })
            }
            Err(err) => {
                error!(error = %err, "Error fetching properties");
                Loaded::Failed(LOAD_FAILED.to_string())
            }
        }
    }

    pub fn from_properties(properties: Vec<Property>) -> Self {
        Self { properties }
    }

    pub fn all(&self) -> &[Property] {
        &self.properties
    }

    /// Case-insensitive title match against the full fetched set
    pub fn filter(&self, query: &str) -> Vec<&Property> {
        let needle = query.to_lowercase();
        self.properties
            .iter()
            .filter(|property| needle.is_empty() || property.title.to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{property, FakeApi};
    use crate::error::ApiError;

    fn view() -> ListingView {
        ListingView::from_properties(vec![
            property("p1", "Ocean View", 100.0, 4),
            property("p2", "City Loft", 80.0, 2),
        ])
    }

    fn titles(found: Vec<&Property>) -> Vec<&str> {
        found.into_iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn filter_is_case_insensitive() {
        let view = view();
        for query in ["ocean", "OCEAN", "oCeAn"] {
            assert_eq!(titles(view.filter(query)), vec!["Ocean View"]);
        }
    }

    #[test]
    fn empty_query_keeps_order() {
        assert_eq!(titles(view().filter("")), vec!["Ocean View", "City Loft"]);
    }

    #[test]
    fn each_keystroke_filters_the_full_set() {
        let view = view();
        assert!(view.filter("oceanx").is_empty());
        assert_eq!(titles(view.filter("o")), vec!["Ocean View", "City Loft"]);
        assert_eq!(view.all().len(), 2);
    }

    #[tokio::test]
    async fn load_failure_is_reported() {
        let api = FakeApi::new().on_properties(Err(ApiError::Connectivity("down".into())));
        match ListingView::load(&api).await {
            Loaded::Failed(message) => assert_eq!(message, LOAD_FAILED),
            other => panic!("unexpected {other:?}"),
        }
    }
}
