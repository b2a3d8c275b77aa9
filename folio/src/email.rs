use anyhow::Context;
use folio_config::EmailConfig;
use folio_email_impl::EmailServiceImpl;
use folio_persistence_smtp::{SmtpContactStore, SmtpContactStoreConfig};

/// Set up the SMTP transport. Deliverability is not probed at startup; a
/// broken transport surfaces on the first submission instead.
pub fn connect(config: &EmailConfig) -> anyhow::Result<SmtpContactStore<EmailServiceImpl>> {
    let email = EmailServiceImpl::new(&config.smtp_url).context("Failed to set up SMTP transport")?;
    Ok(SmtpContactStore::new(
        email,
        SmtpContactStoreConfig {
            recipient: config.recipient.clone(),
        },
    ))
}
