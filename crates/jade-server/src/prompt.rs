/// Prompt sent to the model for a `/search` request
pub fn search_prompt(query: &str) -> String {
    format!(
        "Create a web page in HTML format (starting from the <body> tag) that contains \
         information relating to the following query: {query}\n\
         This information should include links to relevant web pages, and other relevant \
         information."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_prompt_embeds_query() {
        let prompt = search_prompt("rust borrow checker");

        assert!(prompt.starts_with("Create a web page in HTML format (starting from the <body> tag)"));
        assert!(prompt.contains("following query: rust borrow checker\n"));
        assert!(prompt.ends_with("other relevant information."));
    }
}
