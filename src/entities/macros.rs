//! Macros for reducing boilerplate when defining content types
//!
//! A content type is a plain serde/validator struct; this macro generates
//! its [`Content`](crate::core::entity::Content) implementation.

/// Implement `Content` for a payload struct
///
/// - `fields`: every serialized field name, optional ones included
/// - `date`: the semantic date field used by range filters (omit for undated content)
/// - `trim`: `String` fields trimmed before validation
/// - `trim_optional`: `Option<String>` fields trimmed, blank values becoming `None`
///
/// # Example
///
/// ```rust,ignore
/// impl_content!(
///     Sermon,
///     "sermons",
///     "sermon",
///     fields: ["title", "speaker", "date"],
///     date: date,
///     trim: [title, speaker],
///     trim_optional: [],
/// );
/// ```
#[macro_export]
macro_rules! impl_content {
    (
        $type:ident,
        $plural:expr,
        $singular:expr,
        fields: [ $( $field:expr ),* $(,)? ],
        $( date: $date:ident, )?
        trim: [ $( $trim:ident ),* $(,)? ],
        trim_optional: [ $( $opt:ident ),* $(,)? ] $(,)?
    ) => {
        impl $crate::core::entity::Content for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn field_names() -> &'static [&'static str] {
                &[ $( $field ),* ]
            }

            $(
                fn date_field() -> Option<&'static str> {
                    Some(stringify!($date))
                }

                fn date(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                    Some(self.$date)
                }
            )?

            fn normalize(&mut self) {
                $( self.$trim = self.$trim.trim().to_string(); )*
                $(
                    self.$opt = self
                        .$opt
                        .take()
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty());
                )*
            }
        }
    };
}
