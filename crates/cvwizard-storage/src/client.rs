/// Shared AWS config for `region`, optionally from a named AWS profile.
/// Credentials otherwise come from the default provider chain.
pub async fn load_sdk_config(region: &str, profile: Option<&str>) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }

    loader.load().await
}
