use std::collections::HashSet;
use std::future::Future;

use crate::platform::{PlatformResult, RemoteCollaborator, RemoteInvitation, RemoteRepository};

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Item returned by a paged listing, identified by a platform id.
pub trait PageItem {
    fn item_id(&self) -> u64;
}

impl PageItem for RemoteRepository {
    fn item_id(&self) -> u64 {
        self.id
    }
}

impl PageItem for RemoteCollaborator {
    fn item_id(&self) -> u64 {
        self.id
    }
}

impl PageItem for RemoteInvitation {
    fn item_id(&self) -> u64 {
        self.id
    }
}

/// Fetch pages starting at index 0 until one comes back shorter than
/// `page_size`, keeping the first occurrence of every item id.
///
/// Items can shift between pages while the listing is walked, so repeated
/// ids are dropped. Errors from `fetch_page` are returned unchanged.
pub async fn fetch_all_pages<T, F, Fut>(page_size: usize, mut fetch_page: F) -> PlatformResult<Vec<T>>
where
    T: PageItem,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = PlatformResult<Vec<T>>>,
{
    let page_size = page_size.max(1);
    let mut page = 0_u32;
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    loop {
        let chunk = fetch_page(page).await?;
        let chunk_len = chunk.len();
        items.extend(chunk.into_iter().filter(|item| seen.insert(item.item_id())));
        if chunk_len < page_size {
            break;
        }
        page = page.saturating_add(1);
    }
    tracing::debug!(pages = pages_fetched(page), items = items.len(), "paginated fetch finished");
    Ok(items)
}

fn pages_fetched(last_page: u32) -> u32 {
    last_page.saturating_add(1)
}
