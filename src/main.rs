fn main() {
    if let Err(err) = jira_normalize::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
