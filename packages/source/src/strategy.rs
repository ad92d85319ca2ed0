//! Ordered fallback over extraction strategies.
//!
//! Used where an agency's page layout has drifted across eras: several
//! strategies are tried in a fixed priority order and the first that yields
//! records wins.

use std::future::Future;

use crate::SourceError;

/// Runs `attempt` for each strategy in order and returns the first
/// non-empty result.
///
/// Policy, kept on purpose even though it can surprise:
/// - strategies run eagerly and one at a time, so priority (not completion
///   order) decides the winner;
/// - an empty result never stops the chain, whether it comes from a wrong
///   layout or from a cutoff that excluded every entry;
/// - when every strategy is empty, the last attempt's empty result is
///   returned rather than an error;
/// - an error from any strategy stops the chain immediately.
///
/// # Errors
///
/// Returns the first [`SourceError`] raised by an attempt.
pub async fn first_non_empty<S, T, F, Fut>(
    strategies: &[S],
    mut attempt: F,
) -> Result<Vec<T>, SourceError>
where
    F: FnMut(&S) -> Fut,
    Fut: Future<Output = Result<Vec<T>, SourceError>>,
{
    let mut last = Vec::new();

    for (index, strategy) in strategies.iter().enumerate() {
        let result = attempt(strategy).await?;
        if !result.is_empty() {
            log::debug!("Strategy {index} produced {} entries", result.len());
            return Ok(result);
        }
        log::debug!("Strategy {index} produced no entries");
        last = result;
    }

    Ok(last)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::future::ready;

    use super::*;

    #[tokio::test]
    async fn stops_at_first_non_empty() {
        let calls = RefCell::new(Vec::new());
        let result = first_non_empty(&[0_usize, 1, 2], |&s| {
            calls.borrow_mut().push(s);
            ready(Ok(if s == 0 { vec![] } else { vec![s * 10] }))
        })
        .await
        .unwrap();

        assert_eq!(result, vec![10]);
        assert_eq!(*calls.borrow(), vec![0, 1]);
    }

    #[tokio::test]
    async fn returns_empty_when_all_empty() {
        let calls = RefCell::new(0);
        let result: Vec<u8> = first_non_empty(&["a", "b", "c"], |_| {
            *calls.borrow_mut() += 1;
            ready(Ok(Vec::new()))
        })
        .await
        .unwrap();

        assert!(result.is_empty());
        assert_eq!(*calls.borrow(), 3);
    }

    #[tokio::test]
    async fn propagates_errors_without_trying_further() {
        let calls = RefCell::new(0);
        let result: Result<Vec<u8>, _> = first_non_empty(&[0, 1], |_| {
            *calls.borrow_mut() += 1;
            ready(Err(SourceError::MalformedEntry {
                message: "boom".to_owned(),
            }))
        })
        .await;

        assert!(matches!(result, Err(SourceError::MalformedEntry { .. })));
        assert_eq!(*calls.borrow(), 1);
    }

    #[tokio::test]
    async fn empty_strategy_list_yields_empty_result() {
        let result: Vec<u8> = first_non_empty::<u8, u8, _, _>(&[], |_| ready(Ok(vec![1])))
            .await
            .unwrap();
        assert!(result.is_empty());
    }
}
