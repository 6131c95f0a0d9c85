//! Manifest parsing
//!
//! Recognized declarations:
//!
//! | Element | Kind | Attributes read (`android:` namespace) |
//! |---|---|---|
//! | `uses-permission` | `Permission` | `name`, `maxSdkVersion` |
//! | `uses-permission-sdk-23` | `RuntimePermission` | `name`, `maxSdkVersion` |
//! | `uses-feature` | `Feature` | `name`, `required`, `glEsVersion` |

pub mod parser;

pub use parser::{parse_manifest_file, parse_manifest_str, ANDROID_NAMESPACE};
