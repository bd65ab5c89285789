/*!

This is the long-form manual for `rank_model` and `rankgen`.

## The spreadsheet

A model is a single worksheet (the first one of an `.xlsx` workbook) or a
`.csv` file. It is organized in sections. A section starts with a row whose
first cell is a marker:

* `Data:` the answers and their characteristics
* `Data type:` how the cells of some columns are parsed
* `Order:` how the values of some characteristics are ranked
* `Details:` additional fields shown on the page of each answer
* `Config:` settings of the generated site

The row right after the marker is the header of the section. The section
stops at the first row with an empty first cell, and the columns stop at the
first empty header cell. When the sheet has no `Data:` marker, the whole sheet
is the data section.

### `Data:`

The layout expected is:

| Data:  |           |       |      |
|--------|-----------|-------|------|
| name   | color     | size  | legs |
| table  | red, blue | large | 4    |
| stool  | red       | small | 3    |
| bench  | green     | large | 4    |

The first column holds the answers unless `answer_column` says otherwise. All
the other columns are characteristics. When two rows share the same answer,
the last one is kept and a warning is printed.

### `Data type:`

Two columns: the column name and a type keyword.

* `int` a whole number
* `int range` a range `low-high` (both ends included), or a single number
* `str list` comma separated strings, deduplicated and sorted
* `link list` comma separated URLs, deduplicated, in their written order

Columns without a type keep their content as one string. A keyword that is not
in this list is an error.

### `Order:`

Two columns: the characteristic and a comma separated list of values, from one
end of the scale to the other. The values are parsed with the type of the
column. Every value present in the data must appear in the order.

A characteristic without an order uses the binary rule: a value weighs 1 for an
answer holding it and 0 otherwise. With an order, a value weighs
`1 - d / n` where `n` is the length of the order and `d` the distance, counted
in positions, to the closest value held by the answer.

### `Details:`

A table whose first column is the answer. Its other fields are appended to the
page of that answer. Links are rendered as such.

### `Config:`

Two columns, key and value:

* `answer_column` the column holding the answers
* `page_title` the title of the generated pages
* `subpage_dir` the directory of the answer and characteristic pages (`pages` by default)
* `ranking` how scores are combined: `mean` (default) or `product`

The same keys can be given in a JSON file with `--config`, in camel case
(`answerColumn`, `pageTitle`, `subpageDir`, `ranking`). The file takes
precedence over the sheet.

## Navigation

The user selects values. An answer stays in the list only if, for every
characteristic with a selection, one of the selected values weighs more than
0 for that answer. Selecting several values of the same characteristic accepts
any of them. The score of a characteristic is the best weight among the
selected values, and the scores are averaged (`mean`) or multiplied
(`product`). Answers are listed by decreasing score; equal scores keep the
order of the spreadsheet.

For every characteristic that is not restricted to exactly one value, the page
offers the values still held by some remaining answer, with their count.

## Translations

`--translation` takes a JSON file mapping labels to the text to display:

```json
{
    "color": "Colour",
    "category": {
        "color": "Colours of the piece"
    }
}
```

Nested objects are groups: `category` holds the titles of the characteristic
pages. A label without translation is displayed as is.

## Output

`rankgen generate` writes:

* `index.html` the navigation page, with the model data embedded
* `navigate.js` the navigation script (embedded in `index.html` with `--embedscripts`)
* `styles.css`
* `pages/match_<n>.html` one page per answer
* `pages/category_<n>.html` one page per characteristic

*/
