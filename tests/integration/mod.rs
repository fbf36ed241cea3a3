//! Integration tests against real git repositories, no mocks

mod helpers;
mod test_changelog_cmd;
mod test_cli;
mod test_scan;
mod test_vcs;
