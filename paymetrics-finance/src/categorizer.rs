//! Deterministic merchant categorization.
//!
//! Priority: user keywords > default keyword/merchant table (only for
//! categories the caller has provisioned) > business-suffix bucket > fallback.
//! No model involved; the same inputs always give the same bucket.

use paymetrics_core::{CategoryDefinition, CategoryName};

struct DefaultRule {
    category: CategoryName,
    /// Matched against merchant + description
    keywords: &'static [&'static str],
    /// Matched against the merchant alone
    merchants: &'static [&'static str],
}

const DEFAULT_RULES: [DefaultRule; 13] = [
    DefaultRule {
        category: CategoryName::FoodAndDining,
        keywords: &[
            "zomato", "swiggy", "uber eats", "dominos", "pizza", "restaurant", "cafe", "food",
            "dining", "mcdonald", "kfc", "subway", "starbucks",
        ],
        merchants: &["zomato", "swiggy", "dominos", "pizza hut", "kfc", "mcdonald"],
    },
    DefaultRule {
        category: CategoryName::Transportation,
        keywords: &[
            "uber", "ola", "metro", "bus", "taxi", "fuel", "petrol", "diesel", "parking", "toll",
            "transport",
        ],
        merchants: &["uber", "ola", "rapido", "indian oil", "bharat petroleum", "hp petrol"],
    },
    DefaultRule {
        category: CategoryName::Shopping,
        keywords: &["amazon", "flipkart", "myntra", "ajio", "shopping", "purchase", "retail", "store"],
        merchants: &["amazon", "flipkart", "myntra", "ajio", "nykaa", "big bazaar"],
    },
    DefaultRule {
        category: CategoryName::Groceries,
        keywords: &["grocery", "supermarket", "vegetables", "fruits", "bigbasket", "grofers", "dunzo"],
        merchants: &["bigbasket", "grofers", "dunzo", "more", "reliance fresh", "dmart"],
    },
    DefaultRule {
        category: CategoryName::Entertainment,
        keywords: &[
            "movie", "cinema", "netflix", "amazon prime", "hotstar", "spotify", "entertainment",
            "gaming",
        ],
        merchants: &["netflix", "amazon prime", "hotstar", "spotify", "bookmyshow", "paytm movies"],
    },
    DefaultRule {
        category: CategoryName::Utilities,
        keywords: &[
            "electricity", "gas", "water", "internet", "mobile", "phone", "recharge", "postpaid",
            "broadband",
        ],
        merchants: &["bsnl", "airtel", "jio", "vodafone", "tata power", "adani gas"],
    },
    DefaultRule {
        category: CategoryName::Healthcare,
        keywords: &[
            "pharmacy", "medicine", "doctor", "hospital", "health", "medical", "apollo", "1mg",
            "pharmeasy",
        ],
        merchants: &["apollo pharmacy", "1mg", "pharmeasy", "netmeds", "apollo hospital"],
    },
    DefaultRule {
        category: CategoryName::Education,
        keywords: &["course", "training", "education", "fees", "tuition", "book", "udemy", "coursera"],
        merchants: &["udemy", "coursera", "byju", "unacademy", "vedantu"],
    },
    DefaultRule {
        category: CategoryName::Travel,
        keywords: &["flight", "hotel", "booking", "travel", "makemytrip", "goibibo", "oyo", "irctc"],
        merchants: &["makemytrip", "goibibo", "cleartrip", "oyo", "irctc", "redbus", "indigo"],
    },
    DefaultRule {
        category: CategoryName::Investment,
        keywords: &[
            "mutual fund", "sip", "stock", "trading", "investment", "zerodha", "groww", "paytm money",
        ],
        merchants: &["zerodha", "groww", "paytm money", "upstox", "angel broking"],
    },
    DefaultRule {
        category: CategoryName::Insurance,
        keywords: &["insurance", "premium", "policy", "lic", "health insurance", "car insurance"],
        merchants: &["lic", "icici prudential", "hdfc life", "bajaj allianz"],
    },
    DefaultRule {
        category: CategoryName::PersonalCare,
        keywords: &["salon", "spa", "cosmetics", "beauty", "personal care", "nykaa", "urban company"],
        merchants: &["nykaa", "urban company", "lakme", "looks salon"],
    },
    DefaultRule {
        category: CategoryName::Transfer,
        keywords: &["neft", "imps", "rtgs", "fund transfer", "trf to", "sent to"],
        merchants: &[],
    },
];

/// Words that mark a registered business rather than a person
pub const BUSINESS_SUFFIXES: [&str; 9] = [
    "pvt", "private", "ltd", "limited", "inc", "corp", "company", "services", "llp",
];

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

pub fn has_business_suffix(text: &str) -> bool {
    words(text).any(|w| BUSINESS_SUFFIXES.contains(&w.as_str()))
}

/// Whether `merchant` reads like a person: one to four capitalised alphabetic
/// words and no business suffix.
///
/// Best effort only. All-caps names and short non-Western names are missed;
/// single-word brands written in title case look like names, which is why
/// known merchant brands are exempted by the categorizer.
pub fn looks_like_person_name(merchant: &str) -> bool {
    let tokens: Vec<&str> = merchant.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() > 4 || has_business_suffix(merchant) {
        return false;
    }
    tokens.iter().all(|token| {
        let token = token.trim_end_matches('.');
        let mut chars = token.chars();
        match chars.next() {
            Some(first) if first.is_alphabetic() && first.is_uppercase() => {
                chars.all(|c| c.is_alphabetic() && c.is_lowercase())
            }
            _ => false,
        }
    })
}

pub struct Categorizer<'a> {
    categories: &'a [CategoryDefinition],
}

impl<'a> Categorizer<'a> {
    pub fn new(categories: &'a [CategoryDefinition]) -> Self {
        Self { categories }
    }

    /// Categorize from merchant and description together.
    pub fn categorize(&self, merchant: &str, description: &str) -> CategoryName {
        let merchant_lower = merchant.to_lowercase();
        let combined = format!("{} {}", merchant_lower, description.to_lowercase());

        if let Some(category) = self.user_match(&combined) {
            return category;
        }
        if let Some(category) = self.default_match(&combined, &merchant_lower) {
            return category;
        }
        if has_business_suffix(&combined) {
            return CategoryName::Services;
        }
        CategoryName::Uncategorized
    }

    /// Categorize from merchant text alone. Person-looking merchants are
    /// peer-to-peer payments and go straight to `Transfer`.
    pub fn categorize_merchant(&self, merchant: &str) -> CategoryName {
        let merchant_lower = merchant.to_lowercase();

        if looks_like_person_name(merchant) && !is_known_brand(merchant) {
            return CategoryName::Transfer;
        }
        if let Some(category) = self.user_match(&merchant_lower) {
            return category;
        }
        if let Some(category) = self.default_match(&merchant_lower, &merchant_lower) {
            return category;
        }
        if has_business_suffix(merchant) {
            return CategoryName::Services;
        }
        CategoryName::Transfer
    }

    /// First user category (in list order) with a keyword contained in `text`
    fn user_match(&self, text: &str) -> Option<CategoryName> {
        self.categories
            .iter()
            .find(|def| {
                def.keywords.iter().any(|k| {
                    let k = k.trim().to_lowercase();
                    !k.is_empty() && text.contains(&k)
                })
            })
            .map(CategoryDefinition::category_name)
    }

    fn default_match(&self, text: &str, merchant: &str) -> Option<CategoryName> {
        DEFAULT_RULES
            .iter()
            .filter(|rule| {
                rule.keywords.iter().any(|k| text.contains(k))
                    || rule.merchants.iter().any(|m| merchant.contains(m))
            })
            .map(|rule| &rule.category)
            .find(|category| self.is_provisioned(category))
            .cloned()
    }

    /// The caller only gets back default buckets it actually has rows for
    fn is_provisioned(&self, category: &CategoryName) -> bool {
        self.categories
            .iter()
            .any(|def| def.is_default && &def.category_name() == category)
    }
}

/// Whole-word brand match, so "Nicolas" doesn't hit "ola"
fn is_known_brand(merchant: &str) -> bool {
    let tokens: Vec<String> = words(merchant).collect();
    DEFAULT_RULES
        .iter()
        .flat_map(|rule| rule.merchants.iter())
        .any(|brand| {
            let brand: Vec<&str> = brand.split_whitespace().collect();
            tokens
                .windows(brand.len())
                .any(|window| window.iter().zip(&brand).all(|(t, b)| t == b))
        })
}

/// Combined-text categorization as a free function
pub fn categorize(merchant: &str, description: &str, categories: &[CategoryDefinition]) -> CategoryName {
    Categorizer::new(categories).categorize(merchant, description)
}
