pub fn render_verification_code(name: &str, code: i32) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Verify your email</h2>
    <p>Hi {name},</p>
    <p>Your verification code is:</p>
    <p style="font-size: 28px; font-weight: bold; letter-spacing: 4px;">{code}</p>
    <p style="color: #666; font-size: 14px;">This code expires in 1 hour. If you didn't create an account, you can ignore this email.</p>
</body>
</html>"#
    )
}

pub fn render_password_reset_code(code: i32) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Password Reset</h2>
    <p>A password reset was requested for your Taskboard account.</p>
    <p>Your password reset verification code is:</p>
    <p style="font-size: 28px; font-weight: bold; letter-spacing: 4px;">{code}</p>
    <p style="color: #666; font-size: 14px;">This code expires in 1 hour. If you didn't request this, you can ignore it.</p>
</body>
</html>"#
    )
}

pub fn render_project_invitation(name: &str, project_name: &str, accept_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>You've been invited to {project_name}</h2>
    <p>Hi {name},</p>
    <p>You've been invited to join the project <strong>{project_name}</strong> on Taskboard.</p>
    <p><a href="{accept_url}" style="display: inline-block; padding: 10px 20px; background: #0070f3; color: white; text-decoration: none; border-radius: 4px;">Accept Invitation</a></p>
    <p style="color: #666; font-size: 14px;">If you didn't expect this email, you can ignore it.</p>
</body>
</html>"#
    )
}

pub fn render_task_assigned(name: &str, task_name: &str, project_name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>New task assigned</h2>
    <p>Hello {name},</p>
    <p>You have been assigned a new task in the project <strong>{project_name}</strong>.</p>
    <ul>
        <li>Task: {task_name}</li>
        <li>Project: {project_name}</li>
    </ul>
    <p>Please check your tasks and start working on it.</p>
</body>
</html>"#
    )
}
