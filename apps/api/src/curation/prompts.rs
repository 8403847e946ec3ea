// LLM prompt templates for the re-ranking pass.

/// System prompt for re-ranking: persona plus the JSON-only rule.
pub const RERANK_SYSTEM: &str = "You are a product curation expert for a liquor wholesale business. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Only use SKUs that appear in the candidate list.";

/// Re-ranking prompt template.
/// Replace: {profile_text}, {candidates_text}, {max_products}
pub const RERANK_PROMPT_TEMPLATE: &str = r#"Curate the best products from the given candidates for the business profile below.

{profile_text}

{candidates_text}

Return a JSON object with this EXACT structure:
{
  "curatedProductIds": ["sku1", "sku2"],
  "reasoning": ["reason1", "reason2"],
  "confidence": 0.85,
  "platinumSupplierProducts": ["sku1"],
  "bundledPacks": ["sku2"],
  "localFavorites": ["sku1"],
  "businessInsights": ["insight1"],
  "nextSteps": ["step1"]
}

Field rules:
- curatedProductIds: product SKUs, at most {max_products}, best first
- confidence: a number between 0.0 and 1.0
- platinumSupplierProducts, bundledPacks, localFavorites: subsets of the candidate SKUs

Guidelines:
1. Select products that best match the venue type and cuisine style
2. Prioritize products available in the specified location
3. Include a good mix of categories appropriate for the venue
4. Consider supplier tiers (platinum > gold > silver > bronze)
5. Include some bundle products for variety
6. Ensure the selection is diverse and not dominated by one brand
7. Keep reasoning concise and business-focused
8. Provide actionable insights and next steps"#;
