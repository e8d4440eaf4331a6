fn main() {
    std::process::exit(jira_cli_lib::run())
}
