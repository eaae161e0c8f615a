use proptest::prelude::*;

use super::pagination::{MAX_LIMIT, MAX_OFFSET, Page, PageCursor, PageRequest};
use crate::error::AppError;

#[test]
fn test_page_request_default() {
    let request = PageRequest::default();
    assert_eq!(request.page, 1);
    assert_eq!(request.limit, 20);
}

#[test]
fn test_page_request_offset() {
    let request = PageRequest { page: 1, limit: 20 };
    assert_eq!(request.offset(), 0);

    let request = PageRequest { page: 3, limit: 10 };
    assert_eq!(request.offset(), 20);
    assert_eq!(request.end_index(), 30);
}

#[test]
fn test_from_query_uses_defaults_when_absent() {
    let request = PageRequest::from_query(None, None).unwrap();
    assert_eq!(request, PageRequest::default());

    let request = PageRequest::from_query(Some("2"), None).unwrap();
    assert_eq!(request, PageRequest { page: 2, limit: 20 });
}

#[test]
fn test_from_query_rejects_malformed_values() {
    for (page, limit) in [
        (Some("abc"), None),
        (Some("0"), None),
        (Some("-1"), None),
        (Some("1.5"), None),
        (None, Some("ten")),
        (None, Some("0")),
        (Some(""), Some("10")),
    ] {
        assert!(
            matches!(
                PageRequest::from_query(page, limit),
                Err(AppError::Validation(_))
            ),
            "page={page:?} limit={limit:?} should be rejected"
        );
    }
}

#[test]
fn test_from_query_rejects_oversized_limit() {
    let too_big = (MAX_LIMIT + 1).to_string();
    assert!(PageRequest::from_query(None, Some(&too_big)).is_err());
    assert!(PageRequest::from_query(None, Some(&MAX_LIMIT.to_string())).is_ok());
}

#[test]
fn test_from_query_rejects_page_past_max_offset() {
    let result = PageRequest::from_query(Some("100000000000000000"), Some("100"));
    assert!(matches!(result, Err(AppError::Validation(_))));

    let result = PageRequest::from_query(Some(&u64::MAX.to_string()), Some("1"));
    assert!(matches!(result, Err(AppError::Validation(_))));

    let last = (MAX_OFFSET + 1).to_string();
    let request = PageRequest::from_query(Some(&last), Some("1")).unwrap();
    assert_eq!(request.offset(), MAX_OFFSET);
    assert!(i64::try_from(request.offset()).is_ok());

    let past = (MAX_OFFSET + 2).to_string();
    assert!(PageRequest::from_query(Some(&past), Some("1")).is_err());
}

#[test]
fn test_first_page_has_next_but_no_previous() {
    // 25 items, 10 per page -> 3 pages
    let page: Page<i32> = Page::new(vec![], PageRequest { page: 1, limit: 10 }, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.next, Some(PageCursor { page: 2, limit: 10 }));
    assert_eq!(page.previous, None);
}

#[test]
fn test_last_page_has_previous_but_no_next() {
    let page: Page<i32> = Page::new(vec![], PageRequest { page: 3, limit: 10 }, 25);
    assert_eq!(page.next, None);
    assert_eq!(page.previous, Some(PageCursor { page: 2, limit: 10 }));
}

#[test]
fn test_exact_fit_has_no_next() {
    let page: Page<i32> = Page::new(vec![], PageRequest { page: 2, limit: 10 }, 20);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.next, None);
}

#[test]
fn test_empty_result() {
    let page: Page<i32> = Page::new(vec![], PageRequest::default(), 0);
    assert_eq!(page.total_pages, 0);
    assert_eq!(page.next, None);
    assert_eq!(page.previous, None);
}

#[test]
fn test_map_keeps_navigation() {
    let page = Page::new(vec![1, 2], PageRequest { page: 2, limit: 2 }, 6).map(|n| n * 10);
    assert_eq!(page.items, vec![10, 20]);
    assert_eq!(page.next, Some(PageCursor { page: 3, limit: 2 }));
    assert_eq!(page.previous, Some(PageCursor { page: 1, limit: 2 }));
}

proptest! {
    /// `next` exists exactly when items remain after this page, and
    /// `previous` exactly when the page is not the first.
    #[test]
    fn prop_cursor_presence(total in 0u64..10_000, page in 1u64..200, limit in 1u64..=MAX_LIMIT) {
        let result: Page<()> = Page::new(vec![], PageRequest { page, limit }, total);

        prop_assert_eq!(result.next.is_some(), page * limit < total);
        prop_assert_eq!(result.previous.is_some(), page > 1);
        prop_assert_eq!(result.total_pages, total.div_ceil(limit));
    }
}
