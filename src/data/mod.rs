/// Data layer: validation, payload types, persistence and chart assembly.
///
/// Architecture:
/// ```text
///   picked file
///        │
///        ▼
///   ┌──────────┐
///   │ validate  │  file name → accepted / "Please select a CSV file"
///   └──────────┘
///        │  (upload workflow talks to the service)
///        ▼
///   ┌──────────┐
///   │  store    │  single slot holding the latest PredictionPayload
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ assemble  │  payload + selected model → series, metrics, features
///   └──────────┘
/// ```

pub mod assemble;
pub mod model;
pub mod store;
pub mod validate;
