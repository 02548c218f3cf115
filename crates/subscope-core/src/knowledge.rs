use crate::model::{CancellationMethod, ServiceAlternative, ServiceCategory, ServiceKnowledge};

/// Curated service records plus keyword lookup. The base is immutable once
/// constructed; callers that need different content inject their own records.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    services: Vec<ServiceKnowledge>,
}

impl KnowledgeBase {
    pub fn new(services: Vec<ServiceKnowledge>) -> Self {
        Self { services }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_services())
    }

    pub fn services(&self) -> &[ServiceKnowledge] {
        &self.services
    }

    pub fn get(&self, id: &str) -> Option<&ServiceKnowledge> {
        self.services.iter().find(|service| service.id == id)
    }

    /// Finds the first service (in declaration order) with a keyword that is a
    /// substring of the query after both are reduced to lowercase
    /// alphanumerics. Declaration order is part of the contract: earlier
    /// records shadow later ones when keywords overlap.
    pub fn lookup(&self, query: &str) -> Option<&ServiceKnowledge> {
        let search = normalize_for_match(query);
        self.services.iter().find(|service| {
            service
                .keywords
                .iter()
                .any(|keyword| search.contains(&normalize_for_match(keyword)))
        })
    }
}

pub fn normalize_for_match(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn service(
    id: &str,
    name: &str,
    category: ServiceCategory,
    logo: &str,
    cancellation_url: &str,
    cancellation_method: CancellationMethod,
    steps: &[&str],
    keywords: &[&str],
) -> ServiceKnowledge {
    ServiceKnowledge {
        id: id.to_string(),
        name: name.to_string(),
        category,
        logo: logo.to_string(),
        cancellation_url: cancellation_url.to_string(),
        cancellation_method,
        steps: steps.iter().map(|step| step.to_string()).collect(),
        keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
        downgrade_options: None,
    }
}

fn with_downgrades(
    mut record: ServiceKnowledge,
    options: &[(&str, &str, &str)],
) -> ServiceKnowledge {
    record.downgrade_options = Some(
        options
            .iter()
            .map(|(name, price, savings)| ServiceAlternative {
                name: name.to_string(),
                price: price.to_string(),
                savings: savings.to_string(),
            })
            .collect(),
    );
    record
}

fn builtin_services() -> Vec<ServiceKnowledge> {
    vec![
        with_downgrades(
            service(
                "netflix",
                "Netflix",
                ServiceCategory::Entertainment,
                "https://upload.wikimedia.org/wikipedia/commons/0/08/Netflix_2015_logo.svg",
                "https://www.netflix.com/cancelplan",
                CancellationMethod::Online,
                &[
                    "Log in to your Netflix account.",
                    "Click on your profile icon and select 'Account'.",
                    "Under 'Membership & Billing', click 'Cancel Membership'.",
                    "Confirm the cancellation on the next page.",
                ],
                &["netflix", "nflx"],
            ),
            &[
                ("Standard with Ads", "$6.99/mo", "Save ~50%"),
                ("Share Account (Extra Member)", "$7.99/mo", "vs Full Sub"),
            ],
        ),
        with_downgrades(
            service(
                "spotify",
                "Spotify",
                ServiceCategory::Entertainment,
                "https://upload.wikimedia.org/wikipedia/commons/1/19/Spotify_logo_without_text.svg",
                "https://www.spotify.com/account/change-plan/",
                CancellationMethod::Online,
                &[
                    "Log in to your Spotify account page.",
                    "Scroll to the 'Your plan' section.",
                    "Click 'Change plan'.",
                    "Scroll to 'Cancel Spotify Premium' and click 'Cancel Premium'.",
                ],
                &["spotify", "spotify ab"],
            ),
            &[
                ("Spotify Duo (2 accts)", "$14.99/mo", "Save $5/mo vs 2 Solos"),
                ("Student Plan", "$5.99/mo", "Save 50%"),
            ],
        ),
        service(
            "youtube_premium",
            "YouTube Premium",
            ServiceCategory::Entertainment,
            "https://upload.wikimedia.org/wikipedia/commons/0/09/YouTube_full-color_icon_%282017%29.svg",
            "https://www.youtube.com/paid_memberships",
            CancellationMethod::Online,
            &[
                "Go to youtube.com/paid_memberships.",
                "Click 'Manage Membership'.",
                "Click 'Deactivate'.",
                "Click 'Continue to Cancel'.",
            ],
            &["youtube", "google *youtube", "youtube premium"],
        ),
        service(
            "disney_plus",
            "Disney+",
            ServiceCategory::Entertainment,
            "https://upload.wikimedia.org/wikipedia/commons/3/3e/Disney%2B_logo.svg",
            "https://www.disneyplus.com/account/subscription",
            CancellationMethod::Online,
            &[
                "Log in to Disney+ via a web browser.",
                "Select your Profile > Account.",
                "Select your Subscription.",
                "Select 'Cancel Subscription'.",
            ],
            &["disney+", "disney plus"],
        ),
        service(
            "prime_video",
            "Prime Video",
            ServiceCategory::Entertainment,
            "https://upload.wikimedia.org/wikipedia/commons/f/f1/Prime_Video.png",
            "https://www.amazon.com/gp/video/settings",
            CancellationMethod::Online,
            &[
                "Go to 'Account & Settings'.",
                "Select the 'Your Account' tab.",
                "Look for 'Your Membership' and click 'End Membership'.",
            ],
            &["prime video", "amazon prime", "amazon video", "amzn digital"],
        ),
        service(
            "hulu",
            "Hulu",
            ServiceCategory::Entertainment,
            "https://upload.wikimedia.org/wikipedia/commons/e/e4/Hulu_Logo.svg",
            "https://secure.hulu.com/account",
            CancellationMethod::Online,
            &[
                "Go to your Account page on a computer or mobile browser.",
                "Select 'Cancel' under 'Your Subscription'.",
                "Select 'Continue to Cancel'.",
                "Select 'Cancel Subscription'.",
            ],
            &["hulu", "hulu.com"],
        ),
        service(
            "hbo_max",
            "Max (HBO)",
            ServiceCategory::Entertainment,
            "https://upload.wikimedia.org/wikipedia/commons/1/17/HBO_Max_Logo.svg",
            "https://auth.max.com/subscription",
            CancellationMethod::Online,
            &[
                "Go to Max.com/subscription and sign in.",
                "Choose 'Cancel Your Subscription'.",
                "Confirm your cancellation.",
            ],
            &["hbo max", "hbo now", "max.com"],
        ),
        service(
            "apple_services",
            "Apple Services",
            ServiceCategory::Utilities,
            "https://upload.wikimedia.org/wikipedia/commons/f/fa/Apple_logo_black.svg",
            "https://support.apple.com/en-us/HT202039",
            CancellationMethod::Online,
            &[
                "Open Settings on your iPhone/iPad.",
                "Tap your name.",
                "Tap 'Subscriptions'.",
                "Tap the subscription you want to manage.",
                "Tap 'Cancel Subscription'.",
            ],
            &["apple.com/bill", "itunes", "apple music", "icloud"],
        ),
        with_downgrades(
            service(
                "adobe_cc",
                "Adobe Creative Cloud",
                ServiceCategory::Software,
                "https://upload.wikimedia.org/wikipedia/commons/a/ac/Creative_Cloud.svg",
                "https://account.adobe.com/plans",
                CancellationMethod::Online,
                &[
                    "Sign in to account.adobe.com/plans.",
                    "Select 'Manage plan' for the plan you want to cancel.",
                    "Select 'Cancel your plan'.",
                    "Beware of early termination fees if you are on an annual contract!",
                ],
                &["adobe", "adobe systems", "photoshop", "creative cloud"],
            ),
            &[
                ("Photography Plan", "$9.99/mo", "Save 80% vs All Apps"),
                (
                    "Retention Effect",
                    "Free 2 Months",
                    "Often offered if you try to cancel",
                ),
            ],
        ),
        service(
            "aws",
            "Amazon Web Services",
            ServiceCategory::Software,
            "https://upload.wikimedia.org/wikipedia/commons/9/93/Amazon_Web_Services_Logo.svg",
            "https://console.aws.amazon.com/billing/home#/account",
            CancellationMethod::Online,
            &[
                "Sign in to the AWS Management Console.",
                "Go to the 'Billing and Cost Management' dashboard.",
                "Go to 'Account Settings'.",
                "Scroll to 'Close Account' and tick the boxes.",
            ],
            &["aws", "amazon web services"],
        ),
        service(
            "google_one",
            "Google One",
            ServiceCategory::Utilities,
            "https://upload.wikimedia.org/wikipedia/commons/4/4e/Google_One_logo.svg",
            "https://one.google.com/settings",
            CancellationMethod::Online,
            &[
                "Go to one.google.com.",
                "Click Settings.",
                "Click 'Cancel membership'.",
                "Click 'Cancel membership' again to confirm.",
            ],
            &["google storage", "google one", "google drive"],
        ),
        service(
            "chatgpt",
            "ChatGPT Plus",
            ServiceCategory::Software,
            "https://upload.wikimedia.org/wikipedia/commons/0/04/ChatGPT_logo.svg",
            "https://chat.openai.com/#settings/Subscription",
            CancellationMethod::Online,
            &[
                "Log in to chat.openai.com.",
                "Click on 'My Plan' or your profile.",
                "Click 'Manage my subscription'.",
                "This opens a Stripe portal; click 'Cancel Plan'.",
            ],
            &["chatgpt", "openai", "chatgpt plus"],
        ),
        service(
            "canva",
            "Canva",
            ServiceCategory::Software,
            "https://upload.wikimedia.org/wikipedia/commons/0/08/Canva_icon_2021.svg",
            "https://www.canva.com/settings/billing",
            CancellationMethod::Online,
            &[
                "Go to 'Account Settings' from the gear icon.",
                "Select 'Billing & Plans'.",
                "Under the plan you want to cancel, click 'More actions' (three dots).",
                "Select 'Request cancellation'.",
            ],
            &["canva"],
        ),
        service(
            "dropbox",
            "Dropbox",
            ServiceCategory::Software,
            "https://upload.wikimedia.org/wikipedia/commons/7/78/Dropbox_Icon.svg",
            "https://www.dropbox.com/account/billing",
            CancellationMethod::Online,
            &[
                "Sign in to Dropbox.",
                "Click your avatar and select 'Settings'.",
                "Click 'Plan'.",
                "Click 'Cancel plan' at the bottom of the page.",
            ],
            &["dropbox"],
        ),
        service(
            "microsoft_365",
            "Microsoft 365",
            ServiceCategory::Software,
            "https://upload.wikimedia.org/wikipedia/commons/4/44/Microsoft_logo.svg",
            "https://account.microsoft.com/services",
            CancellationMethod::Online,
            &[
                "Go to account.microsoft.com/services.",
                "Find your subscription and select 'Manage'.",
                "Select 'Cancel subscription'.",
                "Follow the instructions to confirm.",
            ],
            &["microsoft 365", "msft *office", "microsoft"],
        ),
        service(
            "github",
            "GitHub",
            ServiceCategory::Software,
            "https://upload.wikimedia.org/wikipedia/commons/c/c2/GitHub_Invertocat_Logo.svg",
            "https://github.com/settings/billing",
            CancellationMethod::Online,
            &[
                "Go to Settings > Billing and plans.",
                "Scroll to 'Current plan'.",
                "Select 'Downgrade to Free'.",
            ],
            &["github"],
        ),
        service(
            "zoom",
            "Zoom",
            ServiceCategory::Software,
            "https://upload.wikimedia.org/wikipedia/commons/2/24/Zoom_communications_Logo.svg",
            "https://zoom.us/billing/plan",
            CancellationMethod::Online,
            &[
                "Sign in to the Zoom web portal.",
                "Click 'Account Management' > 'Billing'.",
                "On the 'Current Plans' tab, find the plan you want to cancel and click 'Cancel Plan'.",
            ],
            &["zoom.us", "zoom video"],
        ),
        service(
            "telkomsel",
            "Telkomsel Halo",
            ServiceCategory::Utilities,
            "https://upload.wikimedia.org/wikipedia/commons/b/bc/Telkomsel_2021_icon.svg",
            "https://www.telkomsel.com/support/contact-us",
            CancellationMethod::Phone,
            &[
                "Requires visiting a GraPARI location or calling 188.",
                "Prepare your KTP and KK.",
                "Alternatively, use the MyTelkomsel app to switch to a lower package if full cancellation isn't desired.",
            ],
            &["telkomsel", "kartu halo", "halo"],
        ),
        service(
            "indihome",
            "IndiHome",
            ServiceCategory::Utilities,
            "https://upload.wikimedia.org/wikipedia/commons/b/ba/IndiHome_Logo.svg",
            "https://myih.telkom.co.id/",
            CancellationMethod::Phone,
            &[
                "Best method: Call 147.",
                "Visit a Plasa Telkom nearest to you.",
                "Ensure all bills are paid before requesting termination.",
                "Return the modem/STB devices.",
            ],
            &["indihome", "telkom indonesia"],
        ),
        service(
            "pln",
            "PLN",
            ServiceCategory::Utilities,
            "https://upload.wikimedia.org/wikipedia/commons/2/20/Logo_PLN.svg",
            "https://layanan.pln.co.id/",
            CancellationMethod::Phone,
            &[
                "Call 123 for information.",
                "Visit the nearest PLN office for termination or power change requests.",
            ],
            &["pln", "tagihan listrik"],
        ),
        service(
            "vidio",
            "Vidio",
            ServiceCategory::Entertainment,
            "https://upload.wikimedia.org/wikipedia/commons/9/9a/Vidio_Logo.png",
            "https://www.vidio.com/packages/active",
            CancellationMethod::Online,
            &[
                "Login to Vidio desktop/mobile web.",
                "Go to 'Packages' or 'My Packages'.",
                "Click on 'Active Package'.",
                "Click 'Unsubscribe'.",
            ],
            &["vidio", "vidio.com"],
        ),
        service(
            "ruangguru",
            "Ruangguru",
            ServiceCategory::Software,
            "https://upload.wikimedia.org/wikipedia/commons/d/d4/Logo_Ruangguru_2020.svg",
            "https://bayar.ruangguru.com/",
            CancellationMethod::Email,
            &[
                "Contact info@ruangguru.com.",
                "Or use the help feature in the app.",
                "Subscriptions are often prepaid, so cancellation stops renewal.",
            ],
            &["ruangguru"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::{KnowledgeBase, normalize_for_match};

    #[test]
    fn normalize_for_match_keeps_lowercase_alphanumerics_only() {
        assert_eq!(normalize_for_match("APPLE.COM/BILL 01"), "applecombill01");
        assert_eq!(normalize_for_match("Spotify AB"), "spotifyab");
    }

    #[test]
    fn lookup_matches_on_normalized_substring() {
        let base = KnowledgeBase::builtin();

        let found = base.lookup("NETFLIX.COM subscription");
        assert!(found.is_some());
        if let Some(record) = found {
            assert_eq!(record.id, "netflix");
        }
    }

    #[test]
    fn lookup_ignores_punctuation_differences() {
        let base = KnowledgeBase::builtin();

        let found = base.lookup("APPLE COM BILL");
        assert!(found.is_some());
        if let Some(record) = found {
            assert_eq!(record.id, "apple_services");
        }
    }

    #[test]
    fn lookup_prefers_earlier_declarations_on_overlap() {
        let base = KnowledgeBase::builtin();

        // "amazon prime video" contains keywords of prime_video only, but
        // "youtube" appears in both youtube_premium and google_one queries.
        let found = base.lookup("GOOGLE *YOUTUBE PREMIUM");
        assert!(found.is_some());
        if let Some(record) = found {
            assert_eq!(record.id, "youtube_premium");
        }
    }

    #[test]
    fn lookup_returns_none_for_unknown_merchants() {
        let base = KnowledgeBase::builtin();
        assert!(base.lookup("WARUNG MAKAN SEDERHANA").is_none());
    }

    #[test]
    fn get_finds_records_by_id() {
        let base = KnowledgeBase::builtin();

        let record = base.get("indihome");
        assert!(record.is_some());
        if let Some(record) = record {
            assert_eq!(record.name, "IndiHome");
        }
        assert!(base.get("nonexistent").is_none());
    }
}
