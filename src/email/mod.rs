pub mod templates;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl Mailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    pub async fn send_verification_code(
        &self,
        to_email: &str,
        to_name: &str,
        code: i32,
    ) -> Result<(), String> {
        let html = templates::render_verification_code(to_name, code);
        self.send(to_email, "Email Verification - Taskboard", &html)
            .await
    }

    pub async fn send_password_reset_code(&self, to_email: &str, code: i32) -> Result<(), String> {
        let html = templates::render_password_reset_code(code);
        self.send(to_email, "Password Reset Verification - Taskboard", &html)
            .await
    }

    pub async fn send_project_invitation(
        &self,
        to_email: &str,
        to_name: &str,
        project_name: &str,
        accept_url: &str,
    ) -> Result<(), String> {
        let html = templates::render_project_invitation(to_name, project_name, accept_url);
        self.send(
            to_email,
            &format!("You've been invited to {project_name} - Taskboard"),
            &html,
        )
        .await
    }

    pub async fn send_task_assigned(
        &self,
        to_email: &str,
        to_name: &str,
        task_name: &str,
        project_name: &str,
    ) -> Result<(), String> {
        let html = templates::render_task_assigned(to_name, task_name, project_name);
        self.send(to_email, &format!("Task Assigned: {task_name}"), &html)
            .await
    }

    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), String> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {e}"))?,
            )
            .to(to.parse().map_err(|e| format!("Invalid to address: {e}"))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| format!("Failed to build email: {e}"))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {e}"))?;

        Ok(())
    }
}
