//! Bilingual UI string table
//!
//! A pure static mapping from the language selector to every user-visible
//! string, including the five rating adjectives indexed by `stars - 1`.
//! No state, no computation.

use clean_hurghada_core::{CrewPreference, Language};

/// All user-visible strings for one language
#[derive(Debug, Clone, Copy)]
pub struct UiText {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub welcome: &'static str,
    pub calc_price: &'static str,
    pub book_now: &'static str,
    pub tips: &'static str,
    pub upload: &'static str,
    pub contact: &'static str,
    pub select_type: &'static str,
    pub select_clean: &'static str,
    pub calculate: &'static str,
    pub total: &'static str,
    pub fill_details: &'static str,
    pub name: &'static str,
    pub phone: &'static str,
    pub area: &'static str,
    pub enter_area: &'static str,
    pub date: &'static str,
    pub cleaner_pref: &'static str,
    pub any_crew: &'static str,
    pub female_crew: &'static str,
    pub male_crew: &'static str,
    pub confirm: &'static str,
    pub payment: &'static str,
    pub back: &'static str,
    pub chat_placeholder: &'static str,
    pub payment_link: &'static str,
    pub service_fee: &'static str,
    pub success: &'static str,
    pub rate_service: &'static str,
    pub rate_title: &'static str,
    pub rate_desc: &'static str,
    pub rating_placeholder: &'static str,
    pub submit_rating: &'static str,
    pub rating_thanks: &'static str,
    /// Rating adjectives, indexed by `stars - 1`
    pub stars: [&'static str; 5],
    // Canned quick-action prompts, sent as if typed by the user
    pub tips_prompt: &'static str,
    pub contact_prompt: &'static str,
    // Failure strings surfaced in the conversation
    pub chat_failure: &'static str,
    pub image_failure: &'static str,
    pub payment_failed: &'static str,
    pub payment_pending: &'static str,
    pub payment_not_configured: &'static str,
}

const EN: UiText = UiText {
    title: "Clean Hurghada",
    subtitle: "Your Red Sea Cleaning Expert",
    welcome: "Hello! I'm your cleaning assistant in Hurghada. How can I help?",
    calc_price: "Calculate Price",
    book_now: "Book Cleaning",
    tips: "Stain Tips",
    upload: "Upload Photo",
    contact: "Contact Us",
    select_type: "Select Property",
    select_clean: "Cleaning Type",
    calculate: "Get Quote",
    total: "Estimated Total",
    fill_details: "Enter Booking Details",
    name: "Name",
    phone: "Phone (WhatsApp)",
    area: "Area (e.g. El Kawther)",
    enter_area: "Enter area name",
    date: "Preferred Date",
    cleaner_pref: "Cleaner Preference",
    any_crew: "Any Professional Crew",
    female_crew: "Female Cleaners (Housekeeping)",
    male_crew: "Male Cleaners (Heavy Duty)",
    confirm: "Confirm Booking",
    payment: "Proceed to Payment",
    back: "Back",
    chat_placeholder: "Ask me anything...",
    payment_link: "Pay via Vodafone Cash / Paymob",
    service_fee: "Includes 15% service fee",
    success: "Booking Confirmed! We will contact you shortly.",
    rate_service: "Rate Service",
    rate_title: "Rate Your Experience",
    rate_desc: "How was the cleaning quality?",
    rating_placeholder: "Tell us more about the service...",
    submit_rating: "Submit Feedback",
    rating_thanks: "Thank you! We've recorded your feedback.",
    stars: ["Poor", "Fair", "Good", "Very Good", "Excellent"],
    tips_prompt: "Can you give me stain removal tips?",
    contact_prompt: "How can I contact support?",
    chat_failure: "I apologize, something went wrong. Please check your connection.",
    image_failure: "Failed to analyze image. Please try uploading a clearer photo.",
    payment_failed: "Payment error. Please try again later or contact us.",
    payment_pending: "The payment is not confirmed yet. Please finish the checkout or try again.",
    payment_not_configured: "Payment is not configured. Please contact support.",
};

const AR: UiText = UiText {
    title: "تنظيف الغردقة",
    subtitle: "خبير التنظيف في البحر الأحمر",
    welcome: "مرحبا! أنا بوت التنظيف في الغردقة. كيف يمكنني مساعدتك؟",
    calc_price: "احسب السعر",
    book_now: "احجز تنظيف",
    tips: "نصائح البقع",
    upload: "رفع صورة",
    contact: "اتصل بنا",
    select_type: "اختر العقار",
    select_clean: "نوع التنظيف",
    calculate: "احسب التكلفة",
    total: "الإجمالي التقديري",
    fill_details: "أدخل تفاصيل الحجز",
    name: "الاسم",
    phone: "رقم الهاتف (واتساب)",
    area: "المنطقة (مثلاً الكوثر)",
    enter_area: "أدخل اسم المنطقة",
    date: "الموعد المفضل",
    cleaner_pref: "تفضيل طاقم العمل",
    any_crew: "أي طاقم محترف",
    female_crew: "عاملات نظافة (للمنازل)",
    male_crew: "عمال نظافة (للأعمال الشاقة)",
    confirm: "تأكيد الحجز",
    payment: "انتقل للدفع",
    back: "عودة",
    chat_placeholder: "اسألني أي شيء...",
    payment_link: "ادفع عبر فودافون كاش / Paymob",
    service_fee: "شامل 15% رسوم خدمة",
    success: "تم تأكيد الحجز! سنتواصل معك قريباً.",
    rate_service: "قيم الخدمة",
    rate_title: "قيم تجربتك",
    rate_desc: "كيف كانت جودة التنظيف؟",
    rating_placeholder: "أخبرنا المزيد عن الخدمة...",
    submit_rating: "إرسال التقييم",
    rating_thanks: "شكراً لك! تم تسجيل ملاحظاتك.",
    stars: ["سيء", "مقبول", "جيد", "جيد جداً", "ممتاز"],
    tips_prompt: "ممكن نصائح لإزالة البقع؟",
    contact_prompt: "كيف اتصل بالدعم؟",
    chat_failure: "عذراً، حدث خطأ ما. يرجى التحقق من الاتصال والمحاولة مرة أخرى.",
    image_failure: "تعذر تحليل الصورة. حاول رفع صورة أوضح.",
    payment_failed: "حدث خطأ في الدفع. حاول لاحقاً أو تواصل معنا.",
    payment_pending: "لم يتم تأكيد الدفع بعد. أكمل عملية الدفع أو حاول مرة أخرى.",
    payment_not_configured: "الدفع غير مفعل حالياً. يرجى التواصل مع الدعم.",
};

impl UiText {
    /// Get the string table for a language
    pub fn for_language(language: Language) -> &'static UiText {
        match language {
            Language::English => &EN,
            Language::Arabic => &AR,
        }
    }

    /// Label for a crew preference
    pub fn crew_label(&self, preference: CrewPreference) -> &'static str {
        match preference {
            CrewPreference::Any => self.any_crew,
            CrewPreference::Female => self.female_crew,
            CrewPreference::Male => self.male_crew,
        }
    }

    /// Rating adjective for a star count (1..=5)
    pub fn star_label(&self, stars: u8) -> &'static str {
        let index = (stars.clamp(1, 5) - 1) as usize;
        self.stars[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_differ_per_language() {
        let en = UiText::for_language(Language::English);
        let ar = UiText::for_language(Language::Arabic);
        assert_ne!(en.title, ar.title);
        assert_ne!(en.success, ar.success);
    }

    #[test]
    fn test_crew_labels() {
        let en = UiText::for_language(Language::English);
        assert_eq!(en.crew_label(CrewPreference::Any), en.any_crew);
        assert_eq!(en.crew_label(CrewPreference::Female), en.female_crew);
        assert_eq!(en.crew_label(CrewPreference::Male), en.male_crew);
    }

    #[test]
    fn test_star_labels_indexed_from_one() {
        let en = UiText::for_language(Language::English);
        assert_eq!(en.star_label(1), "Poor");
        assert_eq!(en.star_label(3), "Good");
        assert_eq!(en.star_label(5), "Excellent");
        // Out-of-range values clamp instead of panicking
        assert_eq!(en.star_label(0), "Poor");
        assert_eq!(en.star_label(7), "Excellent");
    }
}
