//! Prompt templates. Each takes content already cut to its budget.

pub const CATEGORY_CHOICES: &str = "Technology, Business, Education, Entertainment, Health, \
     Science, Sports, Politics, Lifestyle, News, Blog, E-commerce, Documentation, Portfolio";

pub fn summary(content: &str) -> String {
    format!(
        "Analyze the following web page content and provide a concise 2-3 sentence \
         summary of what this page is about:\n\n{}",
        content
    )
}

pub fn key_topics(content: &str) -> String {
    format!(
        "Extract 5-7 key topics or themes from the following content. Return only the \
         topics as a comma-separated list:\n\n{}",
        content
    )
}

pub fn sentiment(content: &str) -> String {
    format!(
        "Analyze the overall sentiment of the following content. On the first line respond \
         with only one word: \"positive\", \"negative\", or \"neutral\". On the second line \
         write \"Confidence: N\" where N is your confidence from 0 to 100:\n\n{}",
        content
    )
}

pub fn entities(content: &str) -> String {
    format!(
        "Extract the named entities mentioned in the following content. Answer with exactly \
         four lines in this format, using \"none\" when a category is empty:\n\
         People: name, name\n\
         Organizations: name, name\n\
         Locations: name, name\n\
         Technologies: name, name\n\n{}",
        content
    )
}

pub fn keywords(content: &str, max: usize) -> String {
    format!(
        "List up to {} SEO keywords for the following content with their relevance from 0 \
         to 100. Write one keyword per line in the form \"keyword: relevance\" and nothing \
         else:\n\n{}",
        max, content
    )
}

pub fn content_quality(content: &str) -> String {
    format!(
        "Assess the quality of the following web page content (clarity, depth, structure, \
         usefulness). Give 3-5 short observations, one per line:\n\n{}",
        content
    )
}

pub fn competitive(content: &str) -> String {
    format!(
        "Suggest 3-5 short, concrete ways the following web page could stand out against \
         competing pages on the same subject, one per line:\n\n{}",
        content
    )
}

pub fn categories(content: &str) -> String {
    format!(
        "Categorize the following content into 2-4 categories from this list: {}. Return \
         only the categories as a comma-separated list:\n\n{}",
        CATEGORY_CHOICES, content
    )
}

pub fn paragraph(text: &str) -> String {
    format!(
        "Summarize the following paragraph in one concise sentence. On a new line write \
         \"Importance: N\" where N from 0 to 100 rates how central the paragraph is to \
         the page:\n\n{}",
        text
    )
}
