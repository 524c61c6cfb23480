use super::*;

#[test]
fn defaults_to_loading() {
    assert!(LoadState::<u8>::default().is_loading());
}

#[test]
fn from_result_keeps_error_message() {
    let state = LoadState::<u8>::from_result(Err(ApiError::NotFound { message: "Not found.".to_owned() }));
    assert_eq!(state.error(), Some("Not found."));
    assert!(state.ready().is_none());
}

#[test]
fn from_items_separates_empty_from_ready() {
    assert_eq!(LoadState::<Vec<u8>>::from_items(Ok(vec![])), LoadState::Empty);
    let ready = LoadState::from_items(Ok(vec![1, 2]));
    assert_eq!(ready.items(), &[1, 2]);
}

#[test]
fn items_empty_when_failed() {
    let state = LoadState::<Vec<u8>>::from_items(Err(ApiError::Network("down".to_owned())));
    assert!(state.items().is_empty());
    assert_eq!(state.error(), Some("unable to reach the server: down"));
}
