mod notifications_ws_test;
