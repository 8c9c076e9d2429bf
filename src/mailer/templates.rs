/// HTML email templates

/// Verification email with a button linking to the frontend
pub fn verification_email(name: &str, url: &str) -> String {
    format!(
        r#"
    <div style="font-family: Arial, sans-serif; max-width: 600px; margin: auto; padding: 20px;">
      <p style="font-weight: bold; font-size: 16px;">Dear {name},</p>
      <p style="font-size: 14px; line-height: 1.5;">
        Thank you for registering on <strong>QuickCart</strong>! Please verify your email by clicking the button below.
      </p>
      <a href="{url}"
         target="_blank"
         rel="noopener noreferrer"
         style="
           display: inline-block;
           padding: 12px 25px;
           color: white;
           background-color: #007BFF;
           text-decoration: none;
           border-radius: 5px;
           font-weight: bold;
           font-size: 16px;
           margin-top: 15px;
           text-align: center;
         ">
        Verify Email
      </a>
      <p style="font-size: 12px; color: #666; margin-top: 20px;">
        If you did not create an account, please ignore this email.
      </p>
    </div>
  "#
    )
}

/// Password-reset email carrying the one-hour OTP
pub fn password_reset_email(name: &str, otp: &str) -> String {
    format!(
        r#"
    <div style="font-family: Arial, sans-serif; max-width: 600px; margin: auto; padding: 20px; color: #333;">
      <p style="font-weight: bold; font-size: 16px;">Dear {name},</p>

      <p style="font-size: 14px; line-height: 1.6;">
        You have requested to reset your password. Please use the following OTP to proceed:
      </p>

      <div style="background: #f4f4f4; border: 1px solid #ddd; border-radius: 6px;
                  font-size: 22px; padding: 15px; text-align: center; font-weight: bold; color: #000;">
        {otp}
      </div>

      <p style="font-size: 13px; color: #555; margin-top: 20px; line-height: 1.5;">
        This OTP is valid for <strong>1 hour only</strong>. Enter this OTP on the QuickCart website to reset your password.
      </p>

      <p style="font-size: 13px; color: #555; margin-top: 20px;">
        Thanks,<br/>
        <strong>QuickCart Team</strong>
      </p>
    </div>
  "#
    )
}
