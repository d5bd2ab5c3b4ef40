//! Request handlers.
//!
//! | Route              | Handler              |
//! |--------------------|----------------------|
//! | `GET /track`       | `relay::track`       |
//! | `GET /adwork`      | `relay::adwork`      |
//! | `GET /bidding`     | `bidding::bid`       |
//! | `<prefix>/*`       | `assets` (ServeDir)  |
//! | anything else      | `fallback`           |

pub mod assets;
pub mod bidding;
pub mod fallback;
pub mod relay;
