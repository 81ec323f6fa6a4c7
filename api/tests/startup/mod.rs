mod build_watcher_test;
