pub mod category;
pub mod division;
pub mod post;
pub mod showcase;
pub mod user;

pub use category::{BlogCategory, CategoryDraft, CategoryPatch, NewCategory};
pub use division::{BrandDivision, DivisionDraft, DivisionPatch, NewDivision};
pub use post::{BlogPost, NewPost, PostDraft, PostPatch, PostQuery, DEFAULT_READ_TIME};
pub use showcase::{Achievement, JourneyItem};
pub use user::{NewUser, User, UserDraft, UserPatch};

use serde::{Deserialize, Deserializer};

/// Patch field that distinguishes "absent" (`None`) from an explicit
/// `null` (`Some(None)`), so clients can clear optional columns.
#[allow(clippy::option_option)]
pub(crate) fn deserialize_double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let patch: PostPatch = serde_json::from_value(json!({ "excerpt": null, "title": "New" })).unwrap();
        assert_eq!(patch.excerpt, Some(None));
        assert_eq!(patch.category, None);
        assert_eq!(patch.published_at, None);
        assert_eq!(patch.title.as_deref(), Some("New"));

        let patch: DivisionPatch = serde_json::from_value(json!({ "logoUrl": "https://cdn.example.com/a.png" })).unwrap();
        assert_eq!(patch.logo_url, Some(Some("https://cdn.example.com/a.png".to_string())));
        assert_eq!(patch.description, None);
    }
}
