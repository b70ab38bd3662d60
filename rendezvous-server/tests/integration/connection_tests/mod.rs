mod test_websocket_session;
