//! Cursor-following pagination.
//!
//! A [`Paginator`] threads the server's opaque continuation cursor from
//! each page into the next request. Pages are strictly sequential: page N
//! is only requested after page N-1 has been received.

use std::collections::HashSet;

use futures::stream::{self, Stream};

use crate::cancel::CancelScope;
use crate::client::Client;
use crate::error::Error;
use crate::logging::OpLog;
use crate::operation::Paginated;
use crate::request::Request;
use crate::response::Response;
use crate::transport::Transport;

#[derive(Debug)]
enum PageState {
    /// Another page can be requested
    Pending,
    /// The last page returned a cursor that did not advance
    Stalled(String),
    /// The sequence is exhausted or failed
    Done,
}

/// A lazy, finite sequence of pages for one paginated operation.
///
/// Created by [`Client::paginate`]. The sequence ends when a page carries
/// no continuation cursor (or an empty one). Cursors that fail to advance
/// (the cursor just sent, or any cursor already seen in this sequence)
/// are counted; once `PaginationConfig::stall_limit` consecutive stalls
/// occur, the stalling page is still yielded and the following pull fails
/// with `Error::CursorStalled`, unless that page was the last one allowed
/// by `PaginationConfig::max_pages`, in which case the sequence ends
/// cleanly. After any error the sequence is over.
///
/// # Examples
///
/// ```
/// use typed_ops::operations::DescribeSslPolicies;
/// use typed_ops::{CancelScope, Client, ScriptedTransport, TransportResponse};
///
/// # let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
/// # rt.block_on(async {
/// let transport = ScriptedTransport::new()
///     .reply(TransportResponse::json(200, &serde_json::json!({ "NextMarker": "A" })))
///     .reply(TransportResponse::json(200, &serde_json::json!({ "NextMarker": "" })));
/// let client = Client::new(transport);
/// let scope = CancelScope::new();
///
/// let mut pages = client.paginate::<DescribeSslPolicies>(None);
/// let mut count = 0;
/// while let Some(page) = pages.next_page(&scope).await {
///     page.unwrap();
///     count += 1;
/// }
///
/// assert_eq!(count, 2);
/// # });
/// ```
pub struct Paginator<'a, T, O: Paginated> {
    client: &'a Client<T>,
    base: O::Input,
    cursor: Option<String>,
    seen: HashSet<String>,
    stalls: u32,
    pages: u32,
    state: PageState,
    log: OpLog,
}

impl<'a, T: Transport, O: Paginated> Paginator<'a, T, O> {
    pub(crate) fn new(client: &'a Client<T>, base: O::Input) -> Self {
        let cursor = O::cursor(&base)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Self {
            client,
            base,
            cursor,
            seen: HashSet::new(),
            stalls: 0,
            pages: 0,
            state: PageState::Pending,
            log: OpLog::new(O::DESCRIPTOR.name()),
        }
    }

    /// Returns true if another pull may yield a page or an error.
    pub fn has_more_pages(&self) -> bool {
        match self.state {
            PageState::Pending => !self.page_limit_reached(),
            PageState::Stalled(_) => true,
            PageState::Done => false,
        }
    }

    /// Returns the number of pages received so far.
    pub fn pages_fetched(&self) -> u32 {
        self.pages
    }

    /// Returns the cursor the next request will carry.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Requests the next page.
    ///
    /// Returns `None` once the sequence is exhausted, and after an error
    /// has been returned.
    ///
    /// # Errors
    ///
    /// Yields `Some(Err(_))` for any failure of the underlying call and for
    /// a stalled cursor. Pages already yielded stay valid.
    pub async fn next_page(
        &mut self,
        scope: &CancelScope,
    ) -> Option<Result<Response<O::Output>, Error>> {
        match std::mem::replace(&mut self.state, PageState::Done) {
            PageState::Done => return None,
            PageState::Stalled(cursor) => {
                self.log.warn(format_args!(
                    "cursor '{}' did not advance after {} page(s)",
                    cursor, self.pages
                ));
                return Some(Err(Error::CursorStalled {
                    operation: O::DESCRIPTOR.name(),
                    cursor,
                }));
            }
            PageState::Pending => {}
        }

        if self.page_limit_reached() {
            self.log
                .debug(format_args!("page limit of {} reached", self.pages));
            return None;
        }

        let request = match Request::<O>::with_cursor(&self.base, self.cursor.clone()) {
            Ok(request) => request,
            Err(errors) => return Some(Err(errors.into())),
        };
        let response = match self.client.send_logged(request, scope, self.log).await {
            Ok(response) => response,
            Err(e) => return Some(Err(e)),
        };
        self.pages += 1;

        match O::next_cursor(response.output()).filter(|c| !c.is_empty()) {
            None => {
                self.log
                    .debug(format_args!("page {} is the last page", self.pages));
            }
            Some(next) => {
                self.log
                    .debug(format_args!("page {} continues at '{}'", self.pages, next));
                self.advance(next.to_string());
            }
        }

        Some(Ok(response))
    }

    /// Drains every remaining page and returns all records in order.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; records of earlier pages are
    /// discarded with it.
    pub async fn collect_items(mut self, scope: &CancelScope) -> Result<Vec<O::Item>, Error> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page(scope).await {
            items.extend(O::into_items(page?.into_output()));
        }
        Ok(items)
    }

    /// Adapts the paginator into a [`Stream`] of pages bound to `scope`.
    pub fn into_stream(
        self,
        scope: CancelScope,
    ) -> impl Stream<Item = Result<Response<O::Output>, Error>> + 'a
    where
        T: 'a,
        O: 'a,
    {
        stream::unfold((self, scope), |(mut pager, scope)| async move {
            let page = pager.next_page(&scope).await?;
            Some((page, (pager, scope)))
        })
    }

    fn advance(&mut self, next: String) {
        let advanced = self.cursor.as_deref() != Some(next.as_str()) && !self.seen.contains(&next);
        if advanced {
            self.stalls = 0;
        } else {
            self.stalls += 1;
        }

        if let Some(previous) = self.cursor.replace(next.clone()) {
            self.seen.insert(previous);
        }

        // A page limit reached on the stalling page still ends cleanly.
        let stalled = self.stalls >= self.client.config().pagination.stall_limit.max(1);
        self.state = if stalled && !self.page_limit_reached() {
            PageState::Stalled(next)
        } else {
            PageState::Pending
        };
    }

    fn page_limit_reached(&self) -> bool {
        self.client
            .config()
            .pagination
            .max_pages
            .is_some_and(|max| self.pages >= max)
    }
}
