fn main() -> anyhow::Result<()> {
    audit_form::cli::main()
}
