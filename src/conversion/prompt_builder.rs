//! Client request to model prompt conversion
//!
//! Every function here is plain string templating: the same fields always
//! produce byte-identical prompts.

use crate::core::constants::OPTIMAL_CODE_KEYS;

/// Languages every generated solution is written in
const SOLUTION_LANGUAGES: &str = "C++, Java, Python, and JavaScript";

/// Ask for a hint that does not give the solution away
pub fn hint_prompt(problem_description: &str) -> String {
    format!(
        "You are a coding assistant. Give a helpful hint for the following problem, \
         but do not give away the solution.\nProblem: {problem_description}"
    )
}

/// Ask for a plain-language explanation of an error and a fix
pub fn explain_error_prompt(code: &str, error: &str) -> String {
    format!(
        "Given the following code and error message, explain the error in simple terms \
         and suggest a fix.\nCode:\n{code}\nError:\n{error}"
    )
}

/// Ask for time/space complexity and a hint toward a better approach
pub fn analyze_prompt(code: &str, problem_description: &str) -> String {
    format!(
        "Analyze the following code for the given problem.\n\
         Problem: {problem_description}\n\
         Code:\n{code}\n\
         1. What is the time complexity?\n\
         2. What is the space complexity?\n\
         3. Is there a more optimized approach? If yes, give a hint for it (do not give code)."
    )
}

/// Ask for optimal and brute-force solutions as one flat JSON object
pub fn optimal_code_prompt(problem_description: &str) -> String {
    let code_rules = format!(
        "in all of the following languages: {SOLUTION_LANGUAGES}. Each language's code should \
         be a separate field in the JSON, and must include all necessary brackets and formatting \
         for clarity. Do not use markdown or triple backticks. Each code field should be a plain \
         string."
    );
    let keys = OPTIMAL_CODE_KEYS
        .iter()
        .map(|key| format!("- {key}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\nYou are a coding assistant. For the following problem:\n\
         {problem_description}\n\n\
         1. Provide the most optimal code solution {code_rules}\n\
         2. Provide a brief explanation of the optimal solution, and state its time and space complexity.\n\
         3. Provide a brute-force code solution {code_rules}\n\
         4. Provide a brief explanation of the brute-force solution, and state its time and space complexity.\n\
         5. Compare the optimal and brute-force solutions in terms of efficiency and approach.\n\n\
         Return your response as a single valid JSON object with the following keys:\n\
         {keys}\n\n\
         Do NOT use markdown formatting or triple backticks anywhere. Only output valid JSON.\n"
    )
}

/// Ask for a JSON array of similar problem titles
pub fn similar_problems_prompt(problem_title: &str) -> String {
    format!(
        "\nGiven the following LeetCode problem title, return a list of 4-5 similar LeetCode \
         problem titles. Only return a JSON array of strings (the titles). Do not include any \
         markdown, explanation, or extra text.\n\n\
         Problem title: {problem_title}\n"
    )
}

/// Ask for a JSON array of `{name, year}` objects naming companies that
/// asked the problem
pub fn companies_asked_prompt(problem_title: &str) -> String {
    format!(
        "\nGiven the following LeetCode problem title, return a JSON array of objects, each with \
         'name' (company name) and 'year' (the year the company asked this problem in \
         interviews). Only include real companies and plausible years. Return only the JSON \
         array, no markdown or extra text.\n\n\
         Problem title: {problem_title}\n"
    )
}
