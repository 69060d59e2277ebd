//! Join step: click events inner-joined to their articles.

use tracing::debug;

use super::AssetContext;
use crate::error::{PipelineError, Result};
use crate::table::Table;

pub const CLICK_ARTICLE_ID: &str = "click_article_id";
pub const ARTICLE_ID: &str = "article_id";

/// Inner-join clicks to articles on the article identifier.
///
/// Unmatched rows on either side are dropped; orphaned click events are
/// deliberately excluded rather than null-filled. The duplicate
/// `article_id` column is dropped, leaving `click_article_id` as the
/// surviving key.
pub fn joined_data(_ctx: &AssetContext, inputs: &[Table]) -> Result<Table> {
    let [clicks, articles] = inputs else {
        return Err(PipelineError::Config(format!(
            "joined_data expects 2 upstream tables, got {}",
            inputs.len()
        )));
    };

    let out = clicks.inner_join(articles, CLICK_ARTICLE_ID, ARTICLE_ID)?;
    if out.dropped_left > 0 {
        debug!(
            dropped = out.dropped_left,
            "clicks without a matching article were dropped"
        );
    }
    Ok(out.table)
}
