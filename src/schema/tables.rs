//! Index tables for every entity kind
//!
//! All positional constants of the marketplace protocol live in this file.
//! A protocol shape change should only ever require edits here.

use super::types::{
    Derived, FieldDefault, FieldSchema, FieldSpec, PageLayout, PayloadSource, Segment, Shape,
    Transform,
};
use crate::types::EntityKind;

// ============================================================================
// Page Layouts
// ============================================================================

/// Search sections are reordered between locales; the results section is
/// the first one carrying a cluster at index 22.
const SEARCH_SECTION: Segment = Segment::FirstMatching(Shape::NonEmptyArrayAt(22));

/// The similar-apps cluster link sits in whichever section exposes it.
const SIMILAR_SECTION: Segment = Segment::FirstMatching(Shape::StringAt(path![21, 1, 2, 4, 2]));

/// App detail page: the whole `ds:5` block is the record root
pub static APP_PAGE: PageLayout = PageLayout {
    source: PayloadSource::Dataset("ds:5"),
    items: path![],
    token: None,
};

/// First search page (HTML)
pub static SEARCH_PAGE: PageLayout = PageLayout {
    source: PayloadSource::Dataset("ds:4"),
    items: &[
        Segment::Index(0),
        Segment::Index(1),
        SEARCH_SECTION,
        Segment::Index(22),
        Segment::Index(0),
    ],
    token: Some(&[
        Segment::Index(0),
        Segment::Index(1),
        SEARCH_SECTION,
        Segment::Index(22),
        Segment::Index(1),
        Segment::Index(3),
        Segment::Index(1),
    ]),
};

/// Search continuation pages (batch-execute)
pub static SEARCH_CONTINUATION: PageLayout = PageLayout {
    source: PayloadSource::Rpc("qnKhOb"),
    items: path![0, 0, 0],
    token: Some(path![0, 0, 7, 1]),
};

/// Review batches; the token lives in the second-to-last slot
pub static REVIEWS: PageLayout = PageLayout {
    source: PayloadSource::Rpc("oCPfdb"),
    items: path![0],
    token: Some(&[Segment::FromEnd(2), Segment::FromEnd(1)]),
};

/// Developer portfolio addressed by numeric id
pub static DEVELOPER_NUMERIC: PageLayout = PageLayout {
    source: PayloadSource::Dataset("ds:3"),
    items: path![0, 1, 0, 22, 0],
    token: None,
};

/// Developer portfolio addressed by name
pub static DEVELOPER_NAMED: PageLayout = PageLayout {
    source: PayloadSource::Dataset("ds:3"),
    items: path![0, 1, 0, 21, 0],
    token: None,
};

/// Similar-apps cluster page
pub static CLUSTER: PageLayout = PageLayout {
    source: PayloadSource::Dataset("ds:3"),
    items: path![0, 1, 0, 21, 0],
    token: None,
};

/// Link to the similar-apps cluster on the app detail page
pub static SIMILAR_LINK: PageLayout = PageLayout {
    source: PayloadSource::Dataset("ds:7"),
    items: &[
        Segment::Index(1),
        Segment::Index(1),
        SIMILAR_SECTION,
        Segment::Index(21),
        Segment::Index(1),
        Segment::Index(2),
        Segment::Index(4),
        Segment::Index(2),
    ],
    token: None,
};

/// Top chart batch
pub static TOP_CHART: PageLayout = PageLayout {
    source: PayloadSource::Rpc("vyAe2"),
    items: path![0, 1, 0, 28, 0],
    token: None,
};

/// Autocomplete batch
pub static SUGGEST: PageLayout = PageLayout {
    source: PayloadSource::Rpc("IJ4APc"),
    items: path![0, 0],
    token: None,
};

// ============================================================================
// App
// ============================================================================

static APP_FIELDS: [FieldSpec; 44] = [
    FieldSpec::at("appId", path![1, 2, 77, 0], Transform::Text),
    FieldSpec::at("title", path![1, 2, 0, 0], Transform::Text),
    FieldSpec::at("summary", path![1, 2, 73, 0, 1], Transform::Text),
    FieldSpec::at("description", path![1, 2, 72, 0, 1], Transform::HtmlText)
        .or(FieldDefault::EmptyText),
    FieldSpec::at("installs", path![1, 2, 13, 0], Transform::Text),
    FieldSpec::derived("installsCount", Derived::InstallsCount, FieldDefault::Null),
    FieldSpec::at("minInstalls", path![1, 2, 13, 1], Transform::Integer),
    FieldSpec::at("realInstalls", path![1, 2, 13, 2], Transform::Integer),
    FieldSpec::at("score", path![1, 2, 51, 0, 1], Transform::Float),
    FieldSpec::at("scoreText", path![1, 2, 51, 0, 0], Transform::Text),
    FieldSpec::at("ratings", path![1, 2, 51, 2, 1], Transform::Integer).or(FieldDefault::Zero),
    FieldSpec::at("reviews", path![1, 2, 51, 3, 1], Transform::Integer).or(FieldDefault::Zero),
    FieldSpec::at("histogram", path![1, 2, 51, 1], Transform::Histogram)
        .or(FieldDefault::EmptyList),
    FieldSpec::at("price", path![1, 2, 57, 0, 0, 0, 0, 1, 0, 0], Transform::Micros)
        .or(FieldDefault::ZeroFloat),
    FieldSpec::derived("free", Derived::FreeFromPrice, FieldDefault::True),
    FieldSpec::at("currency", path![1, 2, 57, 0, 0, 0, 0, 1, 0, 1], Transform::Text),
    FieldSpec::at("originalPrice", path![1, 2, 57, 0, 0, 0, 0, 1, 1, 0], Transform::Micros),
    FieldSpec::at("sale", path![1, 2, 57, 0, 0, 0, 0, 14, 0, 0], Transform::Flag)
        .or(FieldDefault::False),
    FieldSpec::at("offersIAP", path![1, 2, 19, 0], Transform::Flag).or(FieldDefault::False),
    FieldSpec::at("inAppProductPrice", path![1, 2, 19, 0], Transform::Text),
    FieldSpec::at("developer", path![1, 2, 68, 0], Transform::Text),
    FieldSpec::at(
        "developerId",
        path![1, 2, 68, 1, 4, 2],
        Transform::QueryParam("id"),
    ),
    FieldSpec::at("developerEmail", path![1, 2, 69, 1, 0], Transform::Text),
    FieldSpec::at("developerWebsite", path![1, 2, 69, 0, 5, 2], Transform::Text),
    FieldSpec::at("developerAddress", path![1, 2, 69, 2, 0], Transform::Text),
    FieldSpec::at("privacyPolicy", path![1, 2, 99, 0, 5, 2], Transform::Text),
    FieldSpec::at("genre", path![1, 2, 79, 0, 0, 0], Transform::Text),
    FieldSpec::at("genreId", path![1, 2, 79, 0, 0, 2], Transform::Text),
    FieldSpec::at("icon", path![1, 2, 95, 0, 3, 2], Transform::ImageUrl),
    FieldSpec::at("headerImage", path![1, 2, 96, 0, 3, 2], Transform::ImageUrl),
    FieldSpec::at(
        "screenshots",
        path![1, 2, 78, 0],
        Transform::ImageList(path![3, 2]),
    )
    .or(FieldDefault::EmptyList),
    FieldSpec::at("video", path![1, 2, 100, 0, 0, 3, 2], Transform::Text),
    FieldSpec::at("videoImage", path![1, 2, 100, 1, 0, 3, 2], Transform::ImageUrl),
    FieldSpec::at("contentRating", path![1, 2, 9, 0], Transform::Text),
    FieldSpec::at("contentRatingDescription", path![1, 2, 9, 2, 1], Transform::Text),
    FieldSpec::at("adSupported", path![1, 2, 48], Transform::Flag).or(FieldDefault::False),
    FieldSpec::at("containsAds", path![1, 2, 48], Transform::Flag).or(FieldDefault::False),
    FieldSpec::at("released", path![1, 2, 10, 0], Transform::Text),
    FieldSpec::at("updated", path![1, 2, 145, 0, 1, 0], Transform::Timestamp),
    FieldSpec::at("version", path![1, 2, 140, 0, 0, 0], Transform::Text),
    FieldSpec::at("androidVersion", path![1, 2, 140, 1, 1, 0, 0, 1], Transform::Text),
    FieldSpec::at("whatsNew", path![1, 2, 144, 1, 1], Transform::HtmlText),
    FieldSpec::at("permissionsSummary", path![1, 2, 74, 2, 0], Transform::JoinStrings(", ")),
    FieldSpec::derived("url", Derived::StoreUrl, FieldDefault::Null),
];

// ============================================================================
// Search Result
// ============================================================================

static SEARCH_RESULT_FIELDS: [FieldSpec; 17] = [
    FieldSpec::at("appId", path![0, 0, 0], Transform::Text),
    FieldSpec::at("title", path![0, 3], Transform::Text),
    FieldSpec::at("icon", path![0, 1, 3, 2], Transform::ImageUrl),
    FieldSpec::at("screenshots", path![0, 2], Transform::ImageList(path![3, 2]))
        .or(FieldDefault::EmptyList),
    FieldSpec::at("video", path![0, 12, 0, 0, 3, 2], Transform::Text),
    FieldSpec::at("videoImage", path![0, 12, 0, 3, 3, 2], Transform::ImageUrl),
    FieldSpec::at("developer", path![0, 14], Transform::Text),
    FieldSpec::at("genre", path![0, 5], Transform::Text),
    FieldSpec::at("description", path![0, 13, 1], Transform::HtmlText)
        .or(FieldDefault::EmptyText),
    FieldSpec::at("score", path![0, 4, 1], Transform::Float),
    FieldSpec::at("scoreText", path![0, 4, 0], Transform::Text),
    FieldSpec::at("installs", path![0, 15], Transform::Text),
    FieldSpec::derived("installsCount", Derived::InstallsCount, FieldDefault::Null),
    FieldSpec::at("price", path![0, 8, 1, 0, 0], Transform::Micros).or(FieldDefault::ZeroFloat),
    FieldSpec::at("currency", path![0, 8, 1, 0, 1], Transform::Text),
    FieldSpec::derived("free", Derived::FreeFromPrice, FieldDefault::True),
    FieldSpec::derived("url", Derived::StoreUrl, FieldDefault::Null),
];

// ============================================================================
// Review
// ============================================================================

static REVIEW_FIELDS: [FieldSpec; 10] = [
    FieldSpec::at("reviewId", path![0], Transform::Text),
    FieldSpec::at("userName", path![1, 0], Transform::Text),
    FieldSpec::at("userImage", path![1, 1, 3, 2], Transform::ImageUrl),
    FieldSpec::at("content", path![4], Transform::Text).or(FieldDefault::EmptyText),
    FieldSpec::at("score", path![2], Transform::Integer).or(FieldDefault::Zero),
    FieldSpec::at("thumbsUpCount", path![6], Transform::Integer).or(FieldDefault::Zero),
    FieldSpec::at("appVersion", path![10], Transform::Text),
    FieldSpec::at("at", path![5, 0], Transform::Timestamp),
    FieldSpec::at("replyContent", path![7, 1], Transform::Text),
    FieldSpec::at("repliedAt", path![7, 2, 0], Transform::Timestamp),
];

// ============================================================================
// Cluster Apps (developer portfolio, similar apps, top charts)
// ============================================================================

static CLUSTER_APP_FIELDS: [FieldSpec; 15] = [
    FieldSpec::at("appId", path![0, 0, 0], Transform::Text),
    FieldSpec::at("title", path![0, 3], Transform::Text),
    FieldSpec::at("icon", path![0, 1, 3, 2], Transform::ImageUrl),
    FieldSpec::at("screenshots", path![0, 2], Transform::ImageList(path![3, 2]))
        .or(FieldDefault::EmptyList),
    FieldSpec::at("developer", path![0, 14], Transform::Text),
    FieldSpec::at("genre", path![0, 5], Transform::Text),
    FieldSpec::at("summary", path![0, 13, 1], Transform::HtmlText).or(FieldDefault::EmptyText),
    FieldSpec::at("score", path![0, 4, 1], Transform::Float),
    FieldSpec::at("scoreText", path![0, 4, 0], Transform::Text),
    FieldSpec::at("installs", path![0, 15], Transform::Text),
    FieldSpec::derived("installsCount", Derived::InstallsCount, FieldDefault::Null),
    FieldSpec::at("price", path![0, 8, 1, 0, 0], Transform::Micros).or(FieldDefault::ZeroFloat),
    FieldSpec::at("currency", path![0, 8, 1, 0, 1], Transform::Text),
    FieldSpec::derived("free", Derived::FreeFromPrice, FieldDefault::True),
    FieldSpec::derived("url", Derived::StoreUrl, FieldDefault::Null),
];

// ============================================================================
// Suggestion
// ============================================================================

static SUGGESTION_FIELDS: [FieldSpec; 1] = [FieldSpec::at("term", path![0], Transform::Text)];

// ============================================================================
// Schemas
// ============================================================================

pub static APP: FieldSchema = FieldSchema {
    kind: EntityKind::App,
    fields: &APP_FIELDS,
};

pub static SEARCH_RESULT: FieldSchema = FieldSchema {
    kind: EntityKind::SearchResult,
    fields: &SEARCH_RESULT_FIELDS,
};

pub static REVIEW: FieldSchema = FieldSchema {
    kind: EntityKind::Review,
    fields: &REVIEW_FIELDS,
};

pub static DEVELOPER_APP: FieldSchema = FieldSchema {
    kind: EntityKind::DeveloperApp,
    fields: &CLUSTER_APP_FIELDS,
};

pub static SIMILAR_APP: FieldSchema = FieldSchema {
    kind: EntityKind::SimilarApp,
    fields: &CLUSTER_APP_FIELDS,
};

pub static LIST_ITEM: FieldSchema = FieldSchema {
    kind: EntityKind::ListItem,
    fields: &CLUSTER_APP_FIELDS,
};

pub static SUGGESTION: FieldSchema = FieldSchema {
    kind: EntityKind::Suggestion,
    fields: &SUGGESTION_FIELDS,
};
